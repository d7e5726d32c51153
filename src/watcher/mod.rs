//! File watching for the JSON store document.
//!
//! Another admin session (or a hand edit) may rewrite the store file at any
//! time. The watcher observes the file's parent directory so creation,
//! replacement by rename, and in-place writes are all seen.

use crate::error::WatcherError;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result type for watcher operations
pub type WatcherResult<T> = Result<T, WatcherError>;

/// Start watching `file`. `on_change` runs on the notify thread for every
/// event touching the file; `on_error` receives watcher failures.
///
/// The returned watcher must be kept alive; dropping it stops the watch.
pub fn watch_file<F, E>(file: &Path, on_change: F, on_error: E) -> WatcherResult<RecommendedWatcher>
where
    F: Fn() + Send + 'static,
    E: Fn(WatcherError) + Send + 'static,
{
    let target = file.to_path_buf();
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if touches(&event, &target) {
                    on_change();
                }
            }
            Err(e) => on_error(e.into()),
        },
        Config::default().with_poll_interval(Duration::from_millis(200)),
    )?;

    watch_path(&mut watcher, &dir)?;
    Ok(watcher)
}

/// Watch a single directory (non-recursive)
fn watch_path(watcher: &mut RecommendedWatcher, path: &Path) -> WatcherResult<()> {
    if path.exists() {
        watcher.watch(path, RecursiveMode::NonRecursive)?;
    } else {
        tracing::warn!(path = %path.display(), "watch path does not exist");
    }
    Ok(())
}

/// True when the event concerns `target`. Compared by file name because the
/// platform may report canonicalized parents.
fn touches(event: &notify::Event, target: &Path) -> bool {
    if !(event.kind.is_create() || event.kind.is_modify()) {
        return false;
    }
    let name = target.file_name();
    event
        .paths
        .iter()
        .any(|p| p == target || (name.is_some() && p.file_name() == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn touches_matches_same_file_name() {
        let target = Path::new("/data/store.json");
        assert!(touches(
            &event(EventKind::Modify(ModifyKind::Any), "/private/data/store.json"),
            target
        ));
        assert!(touches(
            &event(EventKind::Create(CreateKind::File), "/data/store.json"),
            target
        ));
    }

    #[test]
    fn touches_ignores_other_files_and_removals() {
        let target = Path::new("/data/store.json");
        assert!(!touches(
            &event(EventKind::Modify(ModifyKind::Any), "/data/notified.json"),
            target
        ));
        assert!(!touches(
            &event(EventKind::Remove(RemoveKind::File), "/data/store.json"),
            target
        ));
    }

    #[test]
    fn test_watch_path_nonexistent() {
        let mut watcher =
            RecommendedWatcher::new(|_| {}, Config::default()).expect("create watcher");

        let result = watch_path(&mut watcher, Path::new("/nonexistent/path"));
        assert!(result.is_ok());
    }
}
