use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::model::Ticket;

use super::TicketListener;

/// Registered ticket listeners.
///
/// Delivery and removal take the same lock, so once
/// [`Subscription::unsubscribe`] returns the listener is never called again.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    inner: Mutex<Registry>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, TicketListener>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `initial` to the listener and start tracking it.
    pub(crate) fn register(
        self: &Arc<Self>,
        listener: TicketListener,
        initial: Vec<Ticket>,
    ) -> Subscription {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        listener(initial);
        registry.listeners.insert(id, listener);
        tracing::debug!(listener = id, "ticket listener registered");

        Subscription {
            id,
            registry: Arc::downgrade(self),
            active: true,
        }
    }

    pub(crate) fn broadcast(&self, tickets: &[Ticket]) {
        let registry = self.lock();
        for listener in registry.listeners.values() {
            listener(tickets.to_vec());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    fn remove(&self, id: u64) {
        if self.lock().listeners.remove(&id).is_some() {
            tracing::debug!(listener = id, "ticket listener removed");
        }
    }
}

/// Handle of a live ticket subscription. Unsubscribes on drop.
#[must_use = "dropping a Subscription immediately stops delivery"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
    active: bool,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
