use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::error::TicketError;
use crate::model::{Message, Ticket, TicketId, TicketStatus};
use crate::store::TicketStore;

/// State and actions of a single ticket's thread.
///
/// The ticket is re-resolved from every delivery of the shared ticket list;
/// the view-model holds no subscription of its own.
#[derive(Clone)]
pub struct TicketDetailViewModel {
    store: Arc<dyn TicketStore>,
    ticket_id: TicketId,
    ticket: Option<Ticket>,
}

impl TicketDetailViewModel {
    pub fn new(store: Arc<dyn TicketStore>, ticket_id: TicketId) -> Self {
        Self {
            store,
            ticket_id,
            ticket: None,
        }
    }

    /// Build the view-model and resolve the ticket from an existing list.
    pub fn with_tickets(
        store: Arc<dyn TicketStore>,
        ticket_id: TicketId,
        tickets: &[Ticket],
    ) -> Self {
        let mut vm = Self::new(store, ticket_id);
        vm.on_tickets_changed(tickets);
        vm
    }

    pub fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    /// `None` until a delivery containing the ticket arrives, or after it disappears.
    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub fn on_tickets_changed(&mut self, tickets: &[Ticket]) {
        self.ticket = tickets.iter().find(|t| t.id == self.ticket_id).cloned();
    }

    /// Append an admin message and write the whole thread back.
    ///
    /// The write replaces the stored sequence with the locally known one plus
    /// the new message. Two sessions sending from the same base list race and
    /// the later write drops the earlier message.
    pub async fn send_message(&self, text: &str) -> Result<Message, TicketError> {
        if text.trim().is_empty() {
            return Err(TicketError::Validation("message is empty".to_string()));
        }
        let ticket = self
            .ticket
            .as_ref()
            .ok_or_else(|| TicketError::ticket_not_found(&self.ticket_id))?;
        if ticket.status == TicketStatus::Resolved {
            return Err(TicketError::Validation(
                "ticket is resolved and accepts no more messages".to_string(),
            ));
        }

        let message = Message::admin(text, Utc::now());
        let mut messages = ticket.messages.clone();
        messages.push(message.clone());

        self.store
            .append_messages(&self.ticket_id, messages)
            .await?;
        info!(ticket = %self.ticket_id, "admin message sent");
        Ok(message)
    }

    /// Move the ticket to `resolved`, whether or not it has an assignee.
    pub async fn mark_resolved(&self) -> Result<(), TicketError> {
        self.store
            .set_status(&self.ticket_id, TicketStatus::Resolved)
            .await?;
        info!(ticket = %self.ticket_id, "ticket resolved");
        Ok(())
    }
}

impl fmt::Debug for TicketDetailViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketDetailViewModel")
            .field("store", &self.store.name())
            .field("ticket_id", &self.ticket_id)
            .field("loaded", &self.ticket.is_some())
            .finish()
    }
}
