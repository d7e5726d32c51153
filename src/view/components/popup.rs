use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{AppState, InputMode};
use crate::model::Theme;

/// Admin picker overlay, shown while `InputMode::AdminPicker` is active.
pub fn render_admin_picker(frame: &mut Frame, state: &AppState) {
    let InputMode::AdminPicker { ticket_id, selected } = &state.mode else {
        return;
    };

    let area = centered_rect(40, 40, frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = state
        .inbox
        .admins()
        .iter()
        .enumerate()
        .map(|(i, admin)| {
            let is_selected = i == *selected;
            let bg = if is_selected { Theme::SELECTION_BG } else { Theme::BACKGROUND };
            let marker = if is_selected { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Theme::ACCENT).bg(bg)),
                Span::styled(
                    admin.display_name.clone(),
                    Style::default().fg(Theme::ACCENT_PURPLE).bg(bg),
                ),
                Span::styled(
                    format!("  {}", admin.id),
                    Style::default().fg(Theme::MUTED_TEXT).bg(bg),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::ACTIVE_BORDER))
                .title(format!(" Assign {ticket_id} ")),
        )
        .style(Style::default().bg(Theme::BACKGROUND).fg(Theme::TEXT));

    frame.render_widget(list, area);
}

/// Render the help overlay.
/// Lists all keybindings grouped by view.
pub fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(build_help_text())
        .block(
            Block::default()
                .title(" Help - any key to close ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::ACTIVE_BORDER)),
        )
        .alignment(Alignment::Left)
        .style(Style::default().bg(Theme::BACKGROUND).fg(Theme::TEXT));

    frame.render_widget(paragraph, area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Theme::INFO).add_modifier(Modifier::BOLD),
    ))
}

fn build_help_text() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        section("INBOX"),
        Line::from("  j / k       - Move selection"),
        Line::from("  g / G       - First / last ticket"),
        Line::from("  Enter       - Open ticket"),
        Line::from("  a           - Assign selected ticket"),
        Line::from("  r           - Reload admin list"),
        Line::from(""),
        section("TICKET"),
        Line::from("  i / m       - Write a reply"),
        Line::from("  x           - Mark resolved"),
        Line::from("  a           - Assign ticket"),
        Line::from("  j / k       - Scroll thread"),
        Line::from("  Esc         - Back to inbox"),
        Line::from(""),
        section("GENERAL"),
        Line::from("  ?           - Toggle help"),
        Line::from("  q / Ctrl+c  - Quit"),
        Line::from(""),
    ]
}

/// Rect of `percent_x` x `percent_y` centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Admin;
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    #[test]
    fn centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 50, parent);
        assert!(inner.x >= parent.x && inner.right() <= parent.right());
        assert!(inner.y >= parent.y && inner.bottom() <= parent.bottom());
        assert_eq!(inner.width, 50);
    }

    #[test]
    fn admin_picker_lists_admin_names() {
        let mut state = AppState::new(Arc::new(MemoryStore::new()));
        state.inbox.set_admins(vec![Admin::new("A1", "Ana"), Admin::new("A2", "Luis")]);
        state.mode = InputMode::AdminPicker {
            ticket_id: "T1".into(),
            selected: 1,
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let result = terminal
            .draw(|frame| render_admin_picker(frame, &state))
            .unwrap();
        let text: String = result.buffer.content().iter().map(|c| c.symbol()).collect();

        assert!(text.contains("Assign T1"));
        assert!(text.contains("Ana"));
        assert!(text.contains("> Luis"));
    }
}
