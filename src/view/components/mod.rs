pub mod footer;
pub mod format;
pub mod header;
pub mod notices;
pub mod popup;

pub use footer::render_footer;
pub use header::render_header;
pub use notices::render_notice_line;
pub use popup::{centered_rect, render_admin_picker, render_help_overlay};
