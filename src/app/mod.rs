pub mod commands;
pub mod navigation;
pub mod state;
pub mod update;

pub use commands::execute;
pub use navigation::handle_key;
pub use state::{AppState, Command, InputMode, Notice, NoticeLevel, ViewState};
pub use update::update;
