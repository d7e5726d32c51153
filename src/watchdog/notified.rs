use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NotifiedError;
use crate::model::TicketId;

/// Ticket ids the watchdog already warned about.
///
/// Persisted as a JSON object `{ "<ticket id>": true }` so a restart does not
/// repeat warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotifiedSet(BTreeMap<TicketId, bool>);

impl NotifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, ticket_id: &TicketId) -> bool {
        self.0.get(ticket_id).copied().unwrap_or(false)
    }

    /// Record a warning. Returns `false` if the id was already recorded.
    pub fn mark(&mut self, ticket_id: TicketId) -> bool {
        self.0.insert(ticket_id, true) != Some(true)
    }

    /// Keep only ids for which `keep` holds. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&TicketId) -> bool) -> usize {
        let before = self.0.len();
        self.0.retain(|id, _| keep(id));
        before - self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// FUNCTIONAL CORE
// ============================================================================

pub fn serialize_notified(set: &NotifiedSet) -> Result<String, NotifiedError> {
    Ok(serde_json::to_string_pretty(set)?)
}

pub fn deserialize_notified(content: &str) -> Result<NotifiedSet, NotifiedError> {
    if content.trim().is_empty() {
        return Ok(NotifiedSet::new());
    }
    Ok(serde_json::from_str(content)?)
}

// ============================================================================
// IMPERATIVE SHELL
// ============================================================================

/// Load the set from disk. A missing file is an empty set.
pub fn load_notified(path: &Path) -> Result<NotifiedSet, NotifiedError> {
    match fs::read_to_string(path) {
        Ok(content) => deserialize_notified(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(NotifiedSet::new()),
        Err(e) => Err(NotifiedError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Save the set, creating the parent directory if needed.
pub fn save_notified(path: &Path, set: &NotifiedSet) -> Result<(), NotifiedError> {
    let content = serialize_notified(set)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| NotifiedError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| NotifiedError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mark_reports_first_insert_only() {
        let mut set = NotifiedSet::new();
        assert!(set.mark("T1".into()));
        assert!(!set.mark("T1".into()));
        assert!(set.contains(&"T1".into()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn false_entries_do_not_count_as_notified() {
        let set = deserialize_notified(r#"{"T1": false, "T2": true}"#).unwrap();
        assert!(!set.contains(&"T1".into()));
        assert!(set.contains(&"T2".into()));
        assert!(!set.contains(&"T3".into()));
    }

    #[test]
    fn retain_reports_dropped_count() {
        let mut set = NotifiedSet::new();
        set.mark("T1".into());
        set.mark("T2".into());
        set.mark("T3".into());

        let dropped = set.retain(|id| id.as_str() == "T2");
        assert_eq!(dropped, 2);
        assert!(set.contains(&"T2".into()));
    }

    #[test]
    fn serialized_form_is_id_to_true_map() {
        let mut set = NotifiedSet::new();
        set.mark("T1".into());
        let value: serde_json::Value =
            serde_json::from_str(&serialize_notified(&set).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "T1": true }));
    }

    #[test]
    fn save_then_load_from_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("notified.json");

        let mut set = NotifiedSet::new();
        set.mark("T9".into());
        save_notified(&path, &set).unwrap();

        assert_eq!(load_notified(&path).unwrap(), set);
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let set = load_notified(&tmp.path().join("absent.json")).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn corrupt_file_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notified.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(load_notified(&path), Err(NotifiedError::Json(_))));
    }
}
