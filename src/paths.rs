use std::path::{Path, PathBuf};

/// Resolved file locations for ticket-desk.
/// Pure data structure with no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root of all local state.
    /// Example: ~/.local/share/ticket-desk/
    pub data_dir: PathBuf,

    /// JSON store document shared by every admin session.
    /// Example: ~/.local/share/ticket-desk/store.json
    pub store: PathBuf,

    /// Ticket ids the watchdog already warned about.
    /// Example: ~/.local/share/ticket-desk/notified.json
    pub notified: PathBuf,

    /// Log file of the terminal console.
    /// Example: ~/.local/share/ticket-desk/ticket-desk.log
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolves every path under `data_dir`, or under
    /// `$HOME/.local/share/ticket-desk` when none is given.
    ///
    /// Only path concatenation and an environment read. Does NOT create
    /// directories; the store and the notified set do that on first write.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use ticket_desk::paths::Paths;
    ///
    /// let paths = Paths::resolve(Some(Path::new("/srv/desk")));
    /// assert_eq!(paths.store, Path::new("/srv/desk/store.json"));
    /// ```
    pub fn resolve(data_dir: Option<&Path>) -> Self {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir(),
        };

        Self {
            store: data_dir.join("store.json"),
            notified: data_dir.join("notified.json"),
            log_file: data_dir.join("ticket-desk.log"),
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("ticket-desk")
}
