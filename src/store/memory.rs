use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::error::TicketError;
use crate::model::{
    Admin, AdminId, Message, NewTicket, Ticket, TicketId, TicketStatus, User, UserId,
};

use super::listeners::{ListenerRegistry, Subscription};
use super::{StoreDocument, TicketListener, TicketStore};

/// In-process ticket store.
///
/// Every mutation is applied and broadcast under the document lock, so
/// subscribers observe changes in the order they were made. Tests can make
/// the next call fail with [`MemoryStore::fail_next_with`].
pub struct MemoryStore {
    document: Mutex<StoreDocument>,
    listeners: Arc<ListenerRegistry>,
    injected_failure: Mutex<Option<TicketError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_document(StoreDocument::new())
    }

    pub fn with_document(mut document: StoreDocument) -> Self {
        document.normalize_ids();
        Self {
            document: Mutex::new(document),
            listeners: ListenerRegistry::new(),
            injected_failure: Mutex::new(None),
        }
    }

    /// Insert or replace a ticket as-is (timestamps untouched) and notify subscribers.
    pub fn insert_ticket(&self, ticket: Ticket) {
        let mut document = self.lock_document();
        document.tickets.insert(ticket.id.clone(), ticket);
        self.listeners.broadcast(&document.snapshot());
    }

    pub fn insert_user(&self, id: impl Into<String>, user: User) {
        self.lock_document().users.insert(id.into(), user);
    }

    pub fn ticket(&self, ticket_id: &TicketId) -> Option<Ticket> {
        self.lock_document().tickets.get(ticket_id).cloned()
    }

    pub fn document(&self) -> StoreDocument {
        self.lock_document().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Make the next store call fail with `error` instead of touching the document.
    pub fn fail_next_with(&self, error: TicketError) {
        *self
            .injected_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn lock_document(&self) -> MutexGuard<'_, StoreDocument> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_injected_failure(&self) -> Result<(), TicketError> {
        match self
            .injected_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> T) -> Result<T, TicketError> {
        self.take_injected_failure()?;
        Ok(f(&self.lock_document()))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreDocument) -> Result<T, TicketError>,
    ) -> Result<T, TicketError> {
        self.take_injected_failure()?;
        let mut document = self.lock_document();
        let out = f(&mut document)?;
        self.listeners.broadcast(&document.snapshot());
        Ok(out)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn subscribe_tickets(&self, on_change: TicketListener) -> Subscription {
        let document = self.lock_document();
        self.listeners.register(on_change, document.snapshot())
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, TicketError> {
        self.read(StoreDocument::admins)
    }

    async fn user_names(&self) -> Result<BTreeMap<UserId, String>, TicketError> {
        self.read(StoreDocument::user_names)
    }

    async fn fetch_tickets(
        &self,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>, TicketError> {
        self.read(|d| d.tickets_with_status(status))
    }

    async fn create_ticket(&self, new_ticket: NewTicket) -> Result<TicketId, TicketError> {
        let id = self.mutate(|d| d.create_ticket(new_ticket, TicketId::generate(), Utc::now()))?;
        debug!(ticket = %id, store = "memory", "ticket created");
        Ok(id)
    }

    async fn assign(
        &self,
        ticket_id: &TicketId,
        admin_id: &AdminId,
        admin_name: &str,
    ) -> Result<(), TicketError> {
        self.mutate(|d| d.assign(ticket_id, admin_id, admin_name, Utc::now()))?;
        debug!(ticket = %ticket_id, admin = %admin_id, store = "memory", "ticket assigned");
        Ok(())
    }

    async fn set_status(
        &self,
        ticket_id: &TicketId,
        status: TicketStatus,
    ) -> Result<(), TicketError> {
        self.mutate(|d| d.set_status(ticket_id, status, Utc::now()))?;
        debug!(ticket = %ticket_id, %status, store = "memory", "ticket status set");
        Ok(())
    }

    async fn append_messages(
        &self,
        ticket_id: &TicketId,
        messages: Vec<Message>,
    ) -> Result<(), TicketError> {
        let count = messages.len();
        self.mutate(|d| d.replace_messages(ticket_id, messages, Utc::now()))?;
        debug!(ticket = %ticket_id, count, store = "memory", "ticket messages written");
        Ok(())
    }
}
