use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::AppState;
use crate::model::{Theme, Ticket, TicketStatus};
use crate::viewmodel::InboxPhase;
use crate::watchdog::PendingTicket;

use super::components::format::{format_age, truncate};

/// Render the inbox into the given content area: the ticket list on the
/// left and the watchdog's pending list on the right.
pub fn render_inbox(frame: &mut Frame, state: &AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);

    render_ticket_list(frame, columns[0], state);
    render_pending_panel(frame, columns[1], state);
}

fn render_ticket_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(" Tickets ({}) ", state.inbox.tickets().len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::ACTIVE_BORDER))
        .title(title);

    if state.inbox.phase() == InboxPhase::Loading && state.inbox.tickets().is_empty() {
        let list = List::new(vec![ListItem::new(Span::styled(
            "Loading tickets...",
            Style::default().fg(Theme::MUTED_TEXT),
        ))])
        .block(block);
        frame.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = state
        .inbox
        .tickets()
        .iter()
        .enumerate()
        .map(|(i, ticket)| {
            ListItem::new(build_ticket_row(ticket, i == state.selected_index, state))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(Theme::TEXT));

    let mut list_state = ListState::default();
    if !state.inbox.tickets().is_empty() {
        list_state.select(Some(state.selected_index));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn status_symbol(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Pending => "○",
        TicketStatus::Assigned => "◐",
        TicketStatus::Resolved => "●",
    }
}

/// Pure function: one inbox row.
/// Layout: status, id, priority, subject, assignee, age since last update.
fn build_ticket_row(ticket: &Ticket, is_selected: bool, state: &AppState) -> Line<'static> {
    let bg = if is_selected { Theme::SELECTION_BG } else { Theme::BACKGROUND };
    let assignee = ticket
        .assigned_to
        .as_ref()
        .map_or_else(|| "-".to_string(), |a| a.admin_name.clone());

    Line::from(vec![
        Span::styled(
            format!("{} ", status_symbol(ticket.status)),
            Style::default().fg(Theme::status_color(ticket.status)).bg(bg),
        ),
        Span::styled(
            format!("{:<10} ", truncate(ticket.id.as_str(), 10)),
            Style::default().fg(Theme::INFO).bg(bg),
        ),
        Span::styled(
            format!("{:<6} ", ticket.priority.as_str()),
            Style::default().fg(Theme::priority_color(ticket.priority)).bg(bg),
        ),
        Span::styled(
            format!("{:<36} ", truncate(&ticket.subject, 36)),
            Style::default().fg(Theme::TEXT).bg(bg),
        ),
        Span::styled(
            format!("{:<10} ", truncate(&assignee, 10)),
            Style::default().fg(Theme::ACCENT_PURPLE).bg(bg),
        ),
        Span::styled(
            format_age(ticket.updated_at, state.now),
            Style::default().fg(Theme::MUTED_TEXT).bg(bg),
        ),
    ])
}

/// `subject - creator`, as listed in the pending panel.
fn pending_label(pending: &PendingTicket, state: &AppState) -> String {
    format!(
        "{} - {}",
        pending.subject,
        state.inbox.creator_name(&pending.user_id)
    )
}

fn render_pending_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = if state.last_sweep.is_none() {
        vec![ListItem::new(Span::styled(
            "Waiting for first sweep",
            Style::default().fg(Theme::MUTED_TEXT),
        ))]
    } else if state.stale.is_empty() {
        vec![ListItem::new(Span::styled(
            "No pending tickets",
            Style::default().fg(Theme::SUCCESS),
        ))]
    } else {
        state
            .stale
            .iter()
            .map(|p| {
                let color = if p.days_pending >= 1 { Theme::WARNING } else { Theme::MUTED_TEXT };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>3}d ", p.days_pending),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        truncate(&pending_label(p, state), 24),
                        Style::default().fg(Theme::TEXT),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::PANEL_BORDER))
            .title(" Pending "),
    );
    frame.render_widget(list, area);
}
