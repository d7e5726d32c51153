use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::state::{AppState, InputMode, ViewState};

pub mod components;
pub mod inbox;
pub mod ticket_detail;

pub use inbox::render_inbox;
pub use ticket_detail::render_ticket_detail;

/// Main view dispatcher.
/// Header, notice line and footer are shared; the body depends on the view.
/// Admin picker and help are drawn on top.
pub fn render(state: &AppState, frame: &mut Frame) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Notice line
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    components::render_header(frame, rows[0], state);

    match state.view {
        ViewState::Inbox => inbox::render_inbox(frame, state, rows[1]),
        ViewState::Detail => ticket_detail::render_ticket_detail(frame, state, rows[1]),
    }

    components::render_notice_line(frame, rows[2], state);
    components::render_footer(frame, rows[3], state);

    if matches!(state.mode, InputMode::AdminPicker { .. }) {
        components::render_admin_picker(frame, state);
    }

    if state.show_help {
        components::render_help_overlay(frame);
    }
}
