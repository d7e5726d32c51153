use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TicketError;
use crate::model::{
    Admin, AdminId, Assignee, Message, NewTicket, Ticket, TicketId, TicketPriority, TicketStatus,
    User, UserId,
};

// ============================================================================
// FUNCTIONAL CORE: the store's collections and the mutations applied to them
// ============================================================================

/// Full contents of a ticket store: the `tickets` collection keyed by id and
/// the `users` collection keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default, with = "ticket_map")]
    pub tickets: BTreeMap<TicketId, Ticket>,
    #[serde(default)]
    pub users: BTreeMap<String, User>,
}

/// Stored form of a ticket: every field except the id, which is the map key.
/// An `id` field left in the body by older writers is ignored.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketBody {
    subject: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: TicketPriority,
    status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_to: Option<Assignee>,
    #[serde(default)]
    messages: Vec<Message>,
    user_id: UserId,
    #[serde(default)]
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TicketBody {
    fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            assigned_to: ticket.assigned_to.clone(),
            messages: ticket.messages.clone(),
            user_id: ticket.user_id.clone(),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }

    fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            subject: self.subject,
            description: self.description,
            priority: self.priority,
            status: self.status,
            assigned_to: self.assigned_to,
            messages: self.messages,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

mod ticket_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::TicketBody;
    use crate::model::{Ticket, TicketId};

    pub fn serialize<S>(
        tickets: &BTreeMap<TicketId, Ticket>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            tickets
                .iter()
                .map(|(id, ticket)| (id, TicketBody::from_ticket(ticket))),
        )
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<TicketId, Ticket>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bodies = BTreeMap::<TicketId, TicketBody>::deserialize(deserializer)?;
        Ok(bodies
            .into_iter()
            .map(|(id, body)| (id.clone(), body.into_ticket(id)))
            .collect())
    }
}

impl StoreDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.insert(ticket.id.clone(), ticket);
        self
    }

    pub fn with_user(mut self, id: impl Into<String>, user: User) -> Self {
        self.users.insert(id.into(), user);
        self
    }

    /// Make every ticket's `id` agree with the key it is stored under.
    pub fn normalize_ids(&mut self) {
        for (key, ticket) in self.tickets.iter_mut() {
            if &ticket.id != key {
                ticket.id = key.clone();
            }
        }
    }

    /// All tickets in store order (ascending id).
    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.values().cloned().collect()
    }

    pub fn tickets_with_status(&self, status: Option<TicketStatus>) -> Vec<Ticket> {
        self.tickets
            .values()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect()
    }

    pub fn user_names(&self) -> BTreeMap<UserId, String> {
        self.users
            .iter()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, user)| (UserId::new(id.as_str()), user.display_name.clone()))
            .collect()
    }

    pub fn admins(&self) -> Vec<Admin> {
        self.users
            .iter()
            .filter_map(|(id, user)| Admin::from_user(id, user))
            .collect()
    }

    pub fn create_ticket(
        &mut self,
        new_ticket: NewTicket,
        id: TicketId,
        now: DateTime<Utc>,
    ) -> Result<TicketId, TicketError> {
        new_ticket.validate().map_err(TicketError::Validation)?;
        if self.tickets.contains_key(&id) {
            return Err(TicketError::Store(format!("ticket id already exists: {id}")));
        }
        self.tickets
            .insert(id.clone(), new_ticket.into_ticket(id.clone(), now));
        Ok(id)
    }

    pub fn assign(
        &mut self,
        ticket_id: &TicketId,
        admin_id: &AdminId,
        admin_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(), TicketError> {
        let ticket = self.ticket_mut(ticket_id)?;
        ticket.assign(Assignee {
            admin_id: admin_id.clone(),
            admin_name: admin_name.to_string(),
        });
        ticket.updated_at = now;
        Ok(())
    }

    pub fn set_status(
        &mut self,
        ticket_id: &TicketId,
        status: TicketStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TicketError> {
        let ticket = self.ticket_mut(ticket_id)?;
        ticket.status = status;
        ticket.updated_at = now;
        Ok(())
    }

    pub fn replace_messages(
        &mut self,
        ticket_id: &TicketId,
        messages: Vec<Message>,
        now: DateTime<Utc>,
    ) -> Result<(), TicketError> {
        let ticket = self.ticket_mut(ticket_id)?;
        ticket.messages = messages;
        ticket.updated_at = now;
        Ok(())
    }

    fn ticket_mut(&mut self, ticket_id: &TicketId) -> Result<&mut Ticket, TicketError> {
        self.tickets
            .get_mut(ticket_id)
            .ok_or_else(|| TicketError::ticket_not_found(ticket_id))
    }
}
