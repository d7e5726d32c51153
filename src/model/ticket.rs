use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AdminId, TicketId, UserId};

/// Lifecycle of a ticket. Declaration order is the only legal direction of
/// travel: `Pending < Assigned < Resolved`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Pending,
    Assigned,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Resolved => "resolved",
        }
    }

    /// True when moving from `self` to `next` keeps the status monotonic.
    pub fn can_advance_to(self, next: TicketStatus) -> bool {
        next >= self
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Admin,
}

/// One entry of a ticket thread. Never edited after it has been appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn admin(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender: MessageSender::Admin,
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender: MessageSender::User,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub admin_id: AdminId,
    pub admin_name: String,
}

/// A ticket with its id. Stored without the id: the store keys ticket
/// bodies by it (see `StoreDocument`).
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to: Option<Assignee>,
    pub messages: Vec<Message>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(
        id: impl Into<TicketId>,
        user_id: impl Into<UserId>,
        subject: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            description: String::new(),
            priority: TicketPriority::default(),
            status: TicketStatus::Pending,
            assigned_to: None,
            messages: Vec::new(),
            user_id: user_id.into(),
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Record the assignee. A resolved ticket keeps its status; anything
    /// earlier moves to `Assigned`.
    pub fn assign(&mut self, assignee: Assignee) {
        self.assigned_to = Some(assignee);
        if self.status.can_advance_to(TicketStatus::Assigned) {
            self.status = TicketStatus::Assigned;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TicketStatus::Pending
    }
}

/// Input of the end-user "open a ticket" flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub user_id: UserId,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

impl NewTicket {
    pub fn new(
        user_id: impl Into<UserId>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            subject: subject.into(),
            description: description.into(),
            priority: TicketPriority::default(),
        }
    }

    pub fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Subject and description must carry text once trimmed.
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("ticket subject is empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("ticket description is empty".to_string());
        }
        Ok(())
    }

    pub fn into_ticket(self, id: TicketId, now: DateTime<Utc>) -> Ticket {
        Ticket::new(id, self.user_id, self.subject, now)
            .with_description(self.description)
            .with_priority(self.priority)
    }
}
