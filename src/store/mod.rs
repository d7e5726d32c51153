//! Ticket store adapter.
//!
//! [`TicketStore`] is the only writer of ticket documents. View-models and
//! the watchdog receive an `Arc<dyn TicketStore>` instead of reaching for a
//! global connection.

mod document;
mod file;
mod listeners;
mod memory;
pub mod seed;

pub use document::StoreDocument;
pub use file::{read_document, write_document, JsonFileStore};
pub use listeners::Subscription;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::TicketError;
use crate::model::{Admin, AdminId, Message, NewTicket, Ticket, TicketId, TicketStatus, UserId};

/// Callback receiving the full ticket list on registration and on every change.
///
/// Invoked while the store holds its delivery lock: a listener must hand the
/// list off (e.g. over a channel) and never call back into the store.
pub type TicketListener = Box<dyn Fn(Vec<Ticket>) + Send + 'static>;

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Register a live listener. The current list is delivered before this
    /// returns; dropping the [`Subscription`] stops further deliveries.
    fn subscribe_tickets(&self, on_change: TicketListener) -> Subscription;

    /// Users whose role is `admin`. One round trip, not live.
    async fn list_admins(&self) -> Result<Vec<Admin>, TicketError>;

    /// Display names of every user, keyed by user id. One round trip, not live.
    async fn user_names(&self) -> Result<BTreeMap<UserId, String>, TicketError>;

    /// One-shot query, optionally restricted to a single status.
    async fn fetch_tickets(&self, status: Option<TicketStatus>)
        -> Result<Vec<Ticket>, TicketError>;

    /// Open a new `pending` ticket and return its id.
    async fn create_ticket(&self, new_ticket: NewTicket) -> Result<TicketId, TicketError>;

    /// Set the assignee and move the ticket to `assigned`.
    async fn assign(
        &self,
        ticket_id: &TicketId,
        admin_id: &AdminId,
        admin_name: &str,
    ) -> Result<(), TicketError>;

    /// Overwrite the status. Transition legality is the caller's concern.
    async fn set_status(&self, ticket_id: &TicketId, status: TicketStatus)
        -> Result<(), TicketError>;

    /// Replace the whole message sequence. Concurrent writers race:
    /// the last write wins.
    async fn append_messages(
        &self,
        ticket_id: &TicketId,
        messages: Vec<Message>,
    ) -> Result<(), TicketError>;
}
