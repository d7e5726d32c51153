use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, ViewState};
use crate::model::{Theme, TicketStatus};
use crate::viewmodel::InboxPhase;

use super::format::format_age;

/// Render header bar.
/// Shows: view indicator, ticket counts per status, stale count, last sweep.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let header = Paragraph::new(build_header_text(state)).style(
        Style::default()
            .fg(Theme::TEXT)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(header, area);
}

/// Pure function: build header text from state.
fn build_header_text(state: &AppState) -> Line<'static> {
    let view_indicator = match state.view {
        ViewState::Inbox => "[Inbox]".to_string(),
        ViewState::Detail => match &state.detail {
            Some(detail) => format!("[Ticket {}]", detail.ticket_id()),
            None => "[Ticket]".to_string(),
        },
    };

    let mut spans = vec![
        Span::styled("ticket-desk", Style::default().fg(Theme::ACCENT)),
        Span::raw(" "),
        Span::styled(view_indicator, Style::default().fg(Theme::INFO)),
    ];

    if state.inbox.phase() == InboxPhase::Loading {
        spans.push(Span::styled(
            "  loading...",
            Style::default().fg(Theme::MUTED_TEXT),
        ));
        return Line::from(spans);
    }

    for status in [TicketStatus::Pending, TicketStatus::Assigned, TicketStatus::Resolved] {
        spans.push(Span::styled(
            format!("  {} {}", state.inbox.count_with_status(status), status),
            Style::default().fg(Theme::status_color(status)),
        ));
    }

    let stale = state.stale.iter().filter(|p| p.days_pending >= 1).count();
    if stale > 0 {
        spans.push(Span::styled(
            format!("  {stale} stale"),
            Style::default().fg(Theme::WARNING),
        ));
    }

    if let Some(at) = state.last_sweep {
        spans.push(Span::styled(
            format!("  swept {}", format_age(at, state.now)),
            Style::default().fg(Theme::MUTED_TEXT),
        ));
    }

    Line::from(spans)
}
