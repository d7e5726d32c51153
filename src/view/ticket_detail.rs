use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{AppState, InputMode};
use crate::model::{MessageSender, Theme, Ticket};

use super::components::format::format_timestamp;

/// Render the open ticket: summary, message thread and, while composing,
/// the reply box.
pub fn render_ticket_detail(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(ticket) = state.detail.as_ref().and_then(|d| d.ticket()) else {
        let id = state
            .detail
            .as_ref()
            .map_or_else(String::new, |d| d.ticket_id().to_string());
        let missing = Paragraph::new(Line::from(Span::styled(
            format!("Ticket {id} is not available (Esc to go back)"),
            Style::default().fg(Theme::MUTED_TEXT),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };

    let compose_height = if matches!(state.mode, InputMode::Compose(_)) { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),              // Summary
            Constraint::Min(3),                 // Thread
            Constraint::Length(compose_height), // Reply box
        ])
        .split(area);

    let creator = state.inbox.creator_name(&ticket.user_id);
    render_summary(frame, rows[0], ticket, creator);
    render_thread(frame, rows[1], ticket, state.thread_scroll);
    if let InputMode::Compose(draft) = &state.mode {
        render_compose(frame, rows[2], draft);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, ticket: &Ticket, creator: &str) {
    let label = |s: &'static str| Span::styled(s, Style::default().fg(Theme::MUTED_TEXT));
    let assignee = ticket
        .assigned_to
        .as_ref()
        .map_or_else(|| "unassigned".to_string(), |a| format!("{} ({})", a.admin_name, a.admin_id));

    let lines = vec![
        Line::from(vec![
            label("Status:   "),
            Span::styled(
                ticket.status.to_string(),
                Style::default()
                    .fg(Theme::status_color(ticket.status))
                    .add_modifier(Modifier::BOLD),
            ),
            label("   Priority: "),
            Span::styled(
                ticket.priority.as_str(),
                Style::default().fg(Theme::priority_color(ticket.priority)),
            ),
        ]),
        Line::from(vec![
            label("Assignee: "),
            Span::styled(assignee, Style::default().fg(Theme::ACCENT_PURPLE)),
        ]),
        Line::from(vec![
            label("Opened:   "),
            Span::raw(format!("{} by {creator}", format_timestamp(ticket.created_at))),
            label("   Updated: "),
            Span::raw(format_timestamp(ticket.updated_at)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            ticket.description.clone(),
            Style::default().fg(Theme::TEXT),
        )),
    ];

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::ACTIVE_BORDER))
                .title(format!(" {} ", ticket.subject)),
        );
    frame.render_widget(summary, area);
}

/// Pure function: thread lines, one header line plus content per message.
fn build_thread_lines(ticket: &Ticket) -> Vec<Line<'static>> {
    if ticket.messages.is_empty() {
        return vec![Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Theme::MUTED_TEXT),
        ))];
    }

    let mut lines = Vec::with_capacity(ticket.messages.len() * 2);
    for message in &ticket.messages {
        let who = match message.sender {
            MessageSender::User => "user",
            MessageSender::Admin => "admin",
        };
        lines.push(Line::from(vec![
            Span::styled(
                who,
                Style::default()
                    .fg(Theme::sender_color(message.sender))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", format_timestamp(message.timestamp)),
                Style::default().fg(Theme::MUTED_TEXT),
            ),
        ]));
        lines.push(Line::from(format!("  {}", message.content)));
    }
    lines
}

fn render_thread(frame: &mut Frame, area: Rect, ticket: &Ticket, scroll: usize) {
    // two lines per message
    let offset = u16::try_from(scroll.saturating_mul(2)).unwrap_or(u16::MAX);
    let thread = Paragraph::new(build_thread_lines(ticket))
        .wrap(Wrap { trim: false })
        .scroll((offset, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::PANEL_BORDER))
                .title(format!(" Messages ({}) ", ticket.messages.len())),
        );
    frame.render_widget(thread, area);
}

fn render_compose(frame: &mut Frame, area: Rect, draft: &str) {
    let input = Paragraph::new(Line::from(vec![
        Span::raw(draft.to_string()),
        Span::styled("_", Style::default().fg(Theme::ACCENT)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::ACCENT))
            .title(" Reply "),
    );
    frame.render_widget(input, area);
}
