use crate::app::state::{AppState, InputMode, NoticeLevel, ViewState};
use crate::app::handle_key;
use crate::event::AppEvent;

/// Pure update function following Elm Architecture.
/// Takes current state and event, returns new state.
/// No I/O: store work is queued as commands for the event loop.
pub fn update(mut state: AppState, event: AppEvent) -> AppState {
    match event {
        AppEvent::TicketsChanged(tickets) => {
            if let Some(detail) = state.detail.as_mut() {
                let had_ticket = detail.ticket().is_some();
                detail.on_tickets_changed(&tickets);
                if had_ticket && detail.ticket().is_none() {
                    let id = detail.ticket_id().clone();
                    let text = format!("ticket {id} no longer exists");
                    state.push_notice(NoticeLevel::Warning, text);
                }
            }
            state.inbox.on_tickets_changed(tickets);
            clamp_selection(&mut state);
            state
        }

        AppEvent::AdminsLoaded(admins) => {
            state.inbox.set_admins(admins);
            state
        }

        AppEvent::UsersLoaded(user_names) => {
            state.inbox.set_user_names(user_names);
            state
        }

        AppEvent::Key(key) => handle_key(state, key),

        AppEvent::Tick(now) => {
            state.now = now;
            state
        }

        AppEvent::SweepCompleted(report) => {
            state.now = state.now.max(report.at);
            state.last_sweep = Some(report.at);
            if let Some(error) = report.error {
                state.push_notice(NoticeLevel::Error, format!("watchdog: {error}"));
                return state;
            }
            for stale in &report.warnings {
                state.push_notice(NoticeLevel::Warning, stale.to_string());
            }
            state.stale = report.pending;
            state
        }

        AppEvent::CommandSucceeded(text) => {
            state.push_notice(NoticeLevel::Info, text);
            state
        }

        AppEvent::CommandRejected(text) => {
            state.push_notice(NoticeLevel::Warning, text);
            state
        }

        AppEvent::Error { source, error } => {
            state.push_notice(NoticeLevel::Error, format!("{source}: {error}"));
            state
        }
    }
}

/// Keep the inbox cursor and any open picker pointing at existing rows.
fn clamp_selection(state: &mut AppState) {
    let count = state.inbox.tickets().len();
    state.selected_index = state.selected_index.min(count.saturating_sub(1));

    if let InputMode::AdminPicker { ticket_id, .. } = &state.mode {
        let still_there = state.inbox.ticket(ticket_id).is_some();
        if !still_there && state.view == ViewState::Inbox {
            state.mode = InputMode::Normal;
        }
    }
}
