use ratatui::style::Color;

use super::{MessageSender, TicketPriority, TicketStatus};

pub struct Theme;

impl Theme {
    // ── Base palette ────────────────────────────────────────────
    pub const BACKGROUND: Color = Color::Rgb(18, 18, 24);
    pub const TEXT: Color = Color::Rgb(225, 225, 235);
    pub const MUTED_TEXT: Color = Color::Rgb(100, 105, 120);

    // ── Accent colors ───────────────────────────────────────────
    pub const ACCENT: Color = Color::Rgb(80, 200, 200); // teal, primary accent
    pub const ACCENT_WARM: Color = Color::Rgb(230, 160, 60); // amber, waiting on someone
    pub const ACCENT_PURPLE: Color = Color::Rgb(170, 130, 255); // soft purple, admins

    // ── Semantic colors ─────────────────────────────────────────
    pub const SUCCESS: Color = Color::Rgb(80, 210, 120);
    pub const WARNING: Color = Color::Rgb(230, 180, 60);
    pub const ERROR: Color = Color::Rgb(230, 80, 80);
    pub const INFO: Color = Color::Rgb(80, 180, 220);

    // ── UI chrome ───────────────────────────────────────────────
    pub const HEADER_BG: Color = Color::Rgb(24, 24, 32);
    pub const FOOTER_BG: Color = Color::Rgb(24, 24, 32);
    pub const PANEL_BORDER: Color = Color::Rgb(50, 50, 65);
    pub const ACTIVE_BORDER: Color = Color::Rgb(80, 200, 200); // = ACCENT
    pub const SELECTION_BG: Color = Color::Rgb(40, 55, 75);

    /// Get color for ticket status
    pub fn status_color(status: TicketStatus) -> Color {
        match status {
            TicketStatus::Pending => Self::ACCENT_WARM,
            TicketStatus::Assigned => Self::INFO,
            TicketStatus::Resolved => Self::SUCCESS,
        }
    }

    pub fn priority_color(priority: TicketPriority) -> Color {
        match priority {
            TicketPriority::Low => Self::MUTED_TEXT,
            TicketPriority::Medium => Self::TEXT,
            TicketPriority::High => Self::ERROR,
        }
    }

    pub fn sender_color(sender: MessageSender) -> Color {
        match sender {
            MessageSender::User => Self::ACCENT,
            MessageSender::Admin => Self::ACCENT_PURPLE,
        }
    }
}
