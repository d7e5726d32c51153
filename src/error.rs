//! Error types for ticket-desk
//!
//! Domain-specific error enums using thiserror. Store and view-model
//! operations fail with [`TicketError`]; the other enums cover local
//! persistence and file watching.

use std::fmt;

use crate::model::TicketId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ticket,
    Admin,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Ticket => f.write_str("ticket"),
            EntityKind::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TicketError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("store: {0}")]
    Store(String),
    #[error("validation: {0}")]
    Validation(String),
}

impl TicketError {
    pub fn ticket_not_found(id: &TicketId) -> Self {
        TicketError::NotFound {
            kind: EntityKind::Ticket,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreFileError {
    #[error("I/O {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Watcher(#[from] WatcherError),
}

impl From<StoreFileError> for TicketError {
    fn from(e: StoreFileError) -> Self {
        TicketError::Store(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifiedError {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WatcherError {
    #[error("notify: {0}")]
    Notify(String),
    #[error("I/O: {0}")]
    Io(String),
}

impl From<notify::Error> for WatcherError {
    fn from(e: notify::Error) -> Self {
        WatcherError::Notify(e.to_string())
    }
}

impl From<std::io::Error> for WatcherError {
    fn from(e: std::io::Error) -> Self {
        WatcherError::Io(e.to_string())
    }
}

/// Errors shown to the operator on the notice line.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Ticket(#[from] TicketError),
}
