use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{AppState, InputMode, ViewState};
use crate::model::Theme;

/// Render footer status bar with keybinding hints.
/// Shows different keybindings based on current view and input mode.
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let footer = Paragraph::new(build_footer_text(state)).style(
        Style::default()
            .fg(Theme::TEXT)
            .bg(Theme::FOOTER_BG)
            .add_modifier(Modifier::DIM),
    );

    frame.render_widget(footer, area);
}

fn build_footer_text(state: &AppState) -> Line<'static> {
    let keys: &[(&str, &str)] = match (&state.mode, &state.view) {
        (InputMode::AdminPicker { .. }, _) => {
            &[("j/k", "select"), ("Enter", "assign"), ("Esc", "cancel")]
        }
        (InputMode::Compose(_), _) => &[("Enter", "send"), ("Esc", "discard")],
        (InputMode::Normal, ViewState::Inbox) => &[
            ("q", "quit"),
            ("j/k", "move"),
            ("Enter", "open"),
            ("a", "assign"),
            ("r", "reload admins"),
            ("?", "help"),
        ],
        (InputMode::Normal, ViewState::Detail) => &[
            ("q", "quit"),
            ("Esc", "back"),
            ("i", "reply"),
            ("a", "assign"),
            ("x", "resolve"),
            ("j/k", "scroll"),
            ("?", "help"),
        ],
    };

    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Theme::INFO)));
        spans.push(Span::raw(format!(":{action} ")));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn text_of(state: &AppState) -> String {
        build_footer_text(state)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn inbox_footer_lists_assign_key() {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        let text = text_of(&state);
        assert!(text.contains("q:quit"));
        assert!(text.contains("a:assign"));
    }

    #[test]
    fn compose_footer_replaces_view_keys() {
        let mut state = AppState::new(Arc::new(MemoryStore::new()));
        state.mode = InputMode::Compose(String::new());
        let text = text_of(&state);
        assert!(text.contains("Enter:send"));
        assert!(!text.contains("q:quit"));
    }
}
