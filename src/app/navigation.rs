use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::state::{AppState, Command, InputMode, NoticeLevel, ViewState};
use crate::model::TicketStatus;
use crate::viewmodel::{InboxPhase, Navigation, TicketDetailViewModel};

/// Pure navigation state transition function.
/// Takes current state + keyboard event, returns new state.
/// Store side effects are only queued, never performed here.
pub fn handle_key(mut state: AppState, key: KeyEvent) -> AppState {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return state;
    }

    // Help overlay has priority
    if state.show_help {
        state.show_help = false;
        return state;
    }

    match state.mode {
        InputMode::AdminPicker { .. } => return handle_picker_key(state, key),
        InputMode::Compose(_) => return handle_compose_key(state, key),
        InputMode::Normal => {}
    }

    match state.view {
        ViewState::Inbox => handle_inbox_key(state, key),
        ViewState::Detail => handle_detail_key(state, key),
    }
}

fn handle_inbox_key(mut state: AppState, key: KeyEvent) -> AppState {
    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            state
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let count = state.inbox.tickets().len();
            if count > 0 {
                state.selected_index = (state.selected_index + 1).min(count - 1);
            }
            state
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.selected_index = state.selected_index.saturating_sub(1);
            state
        }
        KeyCode::Char('g') | KeyCode::Home => {
            state.selected_index = 0;
            state
        }
        KeyCode::Char('G') | KeyCode::End => {
            state.selected_index = state.inbox.tickets().len().saturating_sub(1);
            state
        }
        KeyCode::Enter => open_detail(state),
        KeyCode::Char('a') => open_admin_picker(state),
        KeyCode::Char('r') => {
            state
                .pending_commands
                .extend([Command::LoadAdmins, Command::LoadUsers]);
            state
        }
        KeyCode::Char('?') => toggle_help(state),
        _ => state,
    }
}

fn handle_detail_key(mut state: AppState, key: KeyEvent) -> AppState {
    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            state
        }
        KeyCode::Esc | KeyCode::Backspace => go_back(state),
        KeyCode::Char('j') | KeyCode::Down => {
            let count = state
                .detail
                .as_ref()
                .and_then(|d| d.ticket())
                .map_or(0, |t| t.messages.len());
            if count > 0 {
                state.thread_scroll = (state.thread_scroll + 1).min(count - 1);
            }
            state
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.thread_scroll = state.thread_scroll.saturating_sub(1);
            state
        }
        KeyCode::Char('i') | KeyCode::Char('m') => start_compose(state),
        KeyCode::Char('x') => mark_resolved(state),
        KeyCode::Char('a') => open_admin_picker(state),
        KeyCode::Char('?') => toggle_help(state),
        _ => state,
    }
}

/// Admin picker: j/k to move, Enter to assign, Esc to cancel.
fn handle_picker_key(mut state: AppState, key: KeyEvent) -> AppState {
    let InputMode::AdminPicker { ticket_id, selected } = state.mode.clone() else {
        return state;
    };
    let admin_count = state.inbox.admins().len();

    match key.code {
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let selected = (selected + 1).min(admin_count.saturating_sub(1));
            state.mode = InputMode::AdminPicker { ticket_id, selected };
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let selected = selected.saturating_sub(1);
            state.mode = InputMode::AdminPicker { ticket_id, selected };
        }
        KeyCode::Enter => {
            if let Some(admin) = state.inbox.admins().get(selected) {
                let admin_id = admin.id.clone();
                state.pending_commands.push(Command::Assign { ticket_id, admin_id });
            }
            state.mode = InputMode::Normal;
        }
        _ => {}
    }
    state
}

/// Compose mode: typed characters go to the draft, Enter sends, Esc discards.
fn handle_compose_key(mut state: AppState, key: KeyEvent) -> AppState {
    let InputMode::Compose(mut draft) = std::mem::replace(&mut state.mode, InputMode::Normal)
    else {
        return state;
    };

    match key.code {
        KeyCode::Esc => {}
        KeyCode::Enter => {
            if let Some(detail) = &state.detail {
                state.pending_commands.push(Command::SendMessage {
                    ticket_id: detail.ticket_id().clone(),
                    text: draft,
                });
            }
        }
        KeyCode::Backspace => {
            draft.pop();
            state.mode = InputMode::Compose(draft);
        }
        KeyCode::Char(c) => {
            draft.push(c);
            state.mode = InputMode::Compose(draft);
        }
        _ => {
            state.mode = InputMode::Compose(draft);
        }
    }
    state
}

/// Open the selected ticket. Builds the detail view-model from the inbox's
/// current list; later deliveries keep it in sync.
fn open_detail(mut state: AppState) -> AppState {
    let Some(ticket) = state.selected_ticket() else {
        return state;
    };
    let Navigation::Detail(ticket_id) = state.inbox.go_to_detail(&ticket.id);

    state.detail = Some(TicketDetailViewModel::with_tickets(
        state.inbox.store().clone(),
        ticket_id,
        state.inbox.tickets(),
    ));
    state.view = ViewState::Detail;
    state.thread_scroll = 0;
    state
}

fn go_back(mut state: AppState) -> AppState {
    state.view = ViewState::Inbox;
    state.detail = None;
    state.thread_scroll = 0;
    state
}

fn open_admin_picker(mut state: AppState) -> AppState {
    let Some(ticket_id) = state.current_ticket().map(|t| t.id.clone()) else {
        return state;
    };
    if state.inbox.phase() == InboxPhase::Loading || state.inbox.admins().is_empty() {
        state.push_notice(NoticeLevel::Warning, "no admins loaded (press r to reload)");
        return state;
    }
    state.mode = InputMode::AdminPicker {
        ticket_id,
        selected: 0,
    };
    state
}

fn start_compose(mut state: AppState) -> AppState {
    match state.current_ticket().map(|t| t.status) {
        None => state,
        Some(TicketStatus::Resolved) => {
            state.push_notice(NoticeLevel::Warning, "ticket is resolved");
            state
        }
        Some(_) => {
            state.mode = InputMode::Compose(String::new());
            state
        }
    }
}

fn mark_resolved(mut state: AppState) -> AppState {
    if let Some(detail) = &state.detail {
        state.pending_commands.push(Command::MarkResolved {
            ticket_id: detail.ticket_id().clone(),
        });
    }
    state
}

fn toggle_help(mut state: AppState) -> AppState {
    state.show_help = !state.show_help;
    state
}
