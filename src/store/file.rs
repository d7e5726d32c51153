use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use notify::RecommendedWatcher;
use tracing::{debug, warn};

use crate::error::{StoreFileError, TicketError};
use crate::model::{
    Admin, AdminId, Message, NewTicket, Ticket, TicketId, TicketStatus, UserId,
};
use crate::watcher;

use super::listeners::{ListenerRegistry, Subscription};
use super::{StoreDocument, TicketListener, TicketStore};

// ============================================================================
// FUNCTIONAL CORE: document (de)serialization
// ============================================================================

pub fn serialize_document(document: &StoreDocument) -> Result<String, StoreFileError> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub fn deserialize_document(content: &str) -> Result<StoreDocument, StoreFileError> {
    if content.trim().is_empty() {
        return Ok(StoreDocument::new());
    }
    Ok(serde_json::from_str(content)?)
}

// ============================================================================
// IMPERATIVE SHELL: file I/O
// ============================================================================

/// Read the store document at `path`. A missing file is an empty store.
pub fn read_document(path: &Path) -> Result<StoreDocument, StoreFileError> {
    match fs::read_to_string(path) {
        Ok(content) => deserialize_document(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::new()),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Write the store document, replacing the file in one rename so readers
/// never observe a half-written document.
pub fn write_document(path: &Path, document: &StoreDocument) -> Result<(), StoreFileError> {
    let content = serialize_document(document)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StoreFileError {
    StoreFileError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// State shared between the async API, blocking workers, and the watcher thread.
struct Shared {
    path: PathBuf,
    /// Last document seen on disk; also serialises writers within this process.
    cache: Mutex<StoreDocument>,
    listeners: Arc<ListenerRegistry>,
}

impl Shared {
    fn lock_cache(&self) -> MutexGuard<'_, StoreDocument> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read-modify-write of the file, then broadcast the new snapshot.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<T, TicketError>,
    ) -> Result<T, TicketError> {
        let mut cache = self.lock_cache();
        let mut document = read_document(&self.path)?;
        let out = f(&mut document)?;
        write_document(&self.path, &document)?;
        *cache = document;
        self.listeners.broadcast(&cache.snapshot());
        Ok(out)
    }

    /// Fresh read from disk. Leaves the cache alone so a pending external
    /// change is still delivered by `reload`.
    fn read(&self) -> Result<StoreDocument, TicketError> {
        Ok(read_document(&self.path)?)
    }

    /// Called from the watcher thread: deliver the file's contents when they
    /// differ from what subscribers last saw.
    fn reload(&self) {
        let mut cache = self.lock_cache();
        match read_document(&self.path) {
            Ok(document) => {
                if *cache != document {
                    debug!(path = %self.path.display(), "store file changed externally");
                    *cache = document;
                    self.listeners.broadcast(&cache.snapshot());
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to reload store file");
            }
        }
    }
}

/// Ticket store backed by a single JSON document on disk.
///
/// Writes go through a read-modify-write of the whole file. Changes made by
/// other processes are picked up by a file watcher and delivered to
/// subscribers like local changes.
pub struct JsonFileStore {
    shared: Arc<Shared>,
    _watcher: Mutex<RecommendedWatcher>,
}

impl JsonFileStore {
    /// Open (creating if needed) the store document at `path` and start watching it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreFileError> {
        let path = path.into();
        if !path.exists() {
            write_document(&path, &StoreDocument::new())?;
        }
        let document = read_document(&path)?;

        let shared = Arc::new(Shared {
            path: path.clone(),
            cache: Mutex::new(document),
            listeners: ListenerRegistry::new(),
        });

        let on_change = {
            let shared = Arc::downgrade(&shared);
            move || {
                if let Some(shared) = shared.upgrade() {
                    shared.reload();
                }
            }
        };
        let on_error = {
            let path = path.clone();
            move |e: crate::error::WatcherError| {
                warn!(path = %path.display(), error = %e, "store file watcher error");
            }
        };
        let watcher = watcher::watch_file(&path, on_change, on_error)?;

        debug!(path = %path.display(), "json file store opened");
        Ok(Self {
            shared,
            _watcher: Mutex::new(watcher),
        })
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, TicketError>
    where
        T: Send + 'static,
        F: FnOnce(&Shared) -> Result<T, TicketError> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || f(&shared))
            .await
            .map_err(|e| TicketError::Store(format!("store worker failed: {e}")))?
    }
}

#[async_trait]
impl TicketStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    fn subscribe_tickets(&self, on_change: TicketListener) -> Subscription {
        let cache = self.shared.lock_cache();
        self.shared.listeners.register(on_change, cache.snapshot())
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, TicketError> {
        self.blocking(|shared| Ok(shared.read()?.admins())).await
    }

    async fn user_names(&self) -> Result<BTreeMap<UserId, String>, TicketError> {
        self.blocking(|shared| Ok(shared.read()?.user_names())).await
    }

    async fn fetch_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, TicketError> {
        self.blocking(move |shared| Ok(shared.read()?.tickets_with_status(status)))
            .await
    }

    async fn create_ticket(&self, new_ticket: NewTicket) -> Result<TicketId, TicketError> {
        let id = self
            .blocking(move |shared| {
                shared.mutate(|d| d.create_ticket(new_ticket, TicketId::generate(), Utc::now()))
            })
            .await?;
        debug!(ticket = %id, store = "json-file", "ticket created");
        Ok(id)
    }

    async fn assign(
        &self,
        ticket_id: &TicketId,
        admin_id: &AdminId,
        admin_name: &str,
    ) -> Result<(), TicketError> {
        let (id, admin, name) = (ticket_id.clone(), admin_id.clone(), admin_name.to_string());
        self.blocking(move |shared| shared.mutate(|d| d.assign(&id, &admin, &name, Utc::now())))
            .await?;
        debug!(ticket = %ticket_id, admin = %admin_id, store = "json-file", "ticket assigned");
        Ok(())
    }

    async fn set_status(
        &self,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<(), TicketError> {
        let id = ticket_id.clone();
        self.blocking(move |shared| shared.mutate(|d| d.set_status(&id, status, Utc::now())))
            .await?;
        debug!(ticket = %ticket_id, %status, store = "json-file", "ticket status set");
        Ok(())
    }

    async fn append_messages(
        &self,
        ticket_id: &TicketId,
        messages: Vec<Message>,
    ) -> Result<(), TicketError> {
        let id = ticket_id.clone();
        let count = messages.len();
        self.blocking(move |shared| {
            shared.mutate(|d| d.replace_messages(&id, messages, Utc::now()))
        })
        .await?;
        debug!(ticket = %ticket_id, count, store = "json-file", "ticket messages written");
        Ok(())
    }
}
