use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::TicketError;
use crate::model::{Admin, AdminId, Ticket, TicketId, TicketStatus, UserId};
use crate::store::TicketStore;

/// Shown for a ticket creator missing from the users collection.
pub const UNKNOWN_USER: &str = "unknown user";

/// Inbox lifecycle: `Loading` until the first ticket delivery and the admin
/// list have both arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxPhase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The store accepted the assignment; the next delivery reflects it.
    Assigned,
    /// The admin is not in the local admin list. Nothing was written.
    UnknownAdmin,
}

/// Navigation signal for the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Detail(TicketId),
}

/// Live list of tickets plus the admins they can be assigned to.
#[derive(Clone)]
pub struct InboxViewModel {
    store: Arc<dyn TicketStore>,
    tickets: Vec<Ticket>,
    admins: Vec<Admin>,
    user_names: BTreeMap<UserId, String>,
    tickets_loaded: bool,
    admins_loaded: bool,
}

impl InboxViewModel {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self {
            store,
            tickets: Vec::new(),
            admins: Vec::new(),
            user_names: BTreeMap::new(),
            tickets_loaded: false,
            admins_loaded: false,
        }
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    pub fn phase(&self) -> InboxPhase {
        if self.tickets_loaded && self.admins_loaded {
            InboxPhase::Ready
        } else {
            InboxPhase::Loading
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    pub fn ticket(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| &t.id == ticket_id)
    }

    pub fn admin(&self, admin_id: &AdminId) -> Option<&Admin> {
        self.admins.iter().find(|a| &a.id == admin_id)
    }

    /// Display name of the user who opened a ticket.
    pub fn creator_name(&self, user_id: &UserId) -> &str {
        self.user_names
            .get(user_id)
            .map_or(UNKNOWN_USER, String::as_str)
    }

    pub fn count_with_status(&self, status: TicketStatus) -> usize {
        self.tickets.iter().filter(|t| t.status == status).count()
    }

    pub fn pending_count(&self) -> usize {
        self.count_with_status(TicketStatus::Pending)
    }

    /// Replace the local list with a subscription delivery. No merging.
    pub fn on_tickets_changed(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.tickets_loaded = true;
    }

    pub fn set_admins(&mut self, admins: Vec<Admin>) {
        self.admins = admins;
        self.admins_loaded = true;
    }

    /// Install the user directory used by [`InboxViewModel::creator_name`].
    /// Does not affect the phase.
    pub fn set_user_names(&mut self, user_names: BTreeMap<UserId, String>) {
        self.user_names = user_names;
    }

    pub async fn fetch_user_names(&self) -> Result<BTreeMap<UserId, String>, TicketError> {
        self.store.user_names().await
    }

    /// Query the store for eligible assignees without touching local state.
    pub async fn fetch_admins(&self) -> Result<Vec<Admin>, TicketError> {
        self.store.list_admins().await
    }

    /// Fetch and install the admin list. On failure the current list stays.
    pub async fn load_admins(&mut self) -> Result<(), TicketError> {
        let admins = self.fetch_admins().await?;
        debug!(count = admins.len(), "admins loaded");
        self.set_admins(admins);
        Ok(())
    }

    /// Assign `ticket_id` to a locally known admin.
    ///
    /// Local state is not touched; the change shows up with the next
    /// subscription delivery.
    pub async fn assign_ticket(
        &self,
        ticket_id: &TicketId,
        admin_id: &AdminId,
    ) -> Result<AssignOutcome, TicketError> {
        let Some(admin) = self.admin(admin_id) else {
            debug!(ticket = %ticket_id, admin = %admin_id, "assignment skipped: unknown admin");
            return Ok(AssignOutcome::UnknownAdmin);
        };

        self.store
            .assign(ticket_id, &admin.id, &admin.display_name)
            .await?;
        info!(ticket = %ticket_id, admin = %admin.id, "ticket assigned");
        Ok(AssignOutcome::Assigned)
    }

    pub fn go_to_detail(&self, ticket_id: &TicketId) -> Navigation {
        Navigation::Detail(ticket_id.clone())
    }
}

impl fmt::Debug for InboxViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboxViewModel")
            .field("store", &self.store.name())
            .field("tickets", &self.tickets.len())
            .field("admins", &self.admins.len())
            .field("users", &self.user_names.len())
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn inbox() -> InboxViewModel {
        InboxViewModel::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn phase_waits_for_tickets_and_admins() {
        let mut vm = inbox();
        assert_eq!(vm.phase(), InboxPhase::Loading);

        vm.on_tickets_changed(Vec::new());
        assert_eq!(vm.phase(), InboxPhase::Loading);

        vm.set_admins(vec![Admin::new("A1", "Ana")]);
        assert_eq!(vm.phase(), InboxPhase::Ready);
    }

    #[test]
    fn on_tickets_changed_replaces_list() {
        let mut vm = inbox();
        vm.on_tickets_changed(vec![
            Ticket::new("T1", "u1", "One", Utc::now()),
            Ticket::new("T2", "u1", "Two", Utc::now()),
        ]);
        vm.on_tickets_changed(vec![Ticket::new("T3", "u1", "Three", Utc::now())]);

        assert_eq!(vm.tickets().len(), 1);
        assert!(vm.ticket(&"T3".into()).is_some());
        assert!(vm.ticket(&"T1".into()).is_none());
    }

    #[test]
    fn go_to_detail_is_pure_signal() {
        let vm = inbox();
        assert_eq!(
            vm.go_to_detail(&"T1".into()),
            Navigation::Detail("T1".into())
        );
    }

    #[test]
    fn count_with_status_counts_matching() {
        let mut vm = inbox();
        vm.on_tickets_changed(vec![
            Ticket::new("T1", "u1", "One", Utc::now()),
            Ticket::new("T2", "u1", "Two", Utc::now()).with_status(TicketStatus::Resolved),
        ]);
        assert_eq!(vm.count_with_status(TicketStatus::Pending), 1);
        assert_eq!(vm.count_with_status(TicketStatus::Assigned), 0);
    }
}
