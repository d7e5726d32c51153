use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, NoticeLevel};
use crate::model::Theme;

use super::format::format_age;

/// One-line strip with the most recent notice.
pub fn render_notice_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match state.latest_notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Theme::INFO,
                NoticeLevel::Warning => Theme::WARNING,
                NoticeLevel::Error => Theme::ERROR,
            };
            Line::from(vec![
                Span::styled(
                    format!("{:>4} ", format_age(notice.at, state.now)),
                    Style::default().fg(Theme::MUTED_TEXT),
                ),
                Span::styled(notice.text.clone(), Style::default().fg(color)),
            ])
        }
        None => Line::from(""),
    };

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Theme::BACKGROUND)),
        area,
    );
}
