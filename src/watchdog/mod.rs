//! Stale-ticket watchdog.
//!
//! A sweep fetches every pending ticket, reports how long each has gone
//! without activity, and raises one warning per ticket the first time it
//! crosses the stale threshold. Warned ids are remembered in a
//! [`NotifiedSet`], optionally persisted across restarts.

pub mod notified;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::TicketError;
use crate::model::{Ticket, TicketId, TicketPriority, TicketStatus, UserId};
use crate::store::TicketStore;

pub use notified::{load_notified, save_notified, NotifiedSet};

/// A pending ticket and its age, as listed in every sweep report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTicket {
    pub ticket_id: TicketId,
    pub subject: String,
    /// Creator of the ticket
    pub user_id: UserId,
    pub priority: TicketPriority,
    pub updated_at: DateTime<Utc>,
    pub days_pending: i64,
}

/// Warning raised once per ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleTicket {
    pub ticket_id: TicketId,
    pub subject: String,
    pub days_pending: i64,
}

impl fmt::Display for StaleTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ticket {} \"{}\" has been pending for {} day(s)",
            self.ticket_id, self.subject, self.days_pending
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub at: DateTime<Utc>,
    pub pending: Vec<PendingTicket>,
    pub warnings: Vec<StaleTicket>,
    /// Set when the store could not be queried; nothing else is reported then.
    pub error: Option<TicketError>,
}

impl SweepReport {
    fn failed(at: DateTime<Utc>, error: TicketError) -> Self {
        Self {
            at,
            pending: Vec::new(),
            warnings: Vec::new(),
            error: Some(error),
        }
    }
}

/// Whole days between `updated_at` and `now`, rounded down. Timestamps in
/// the future count as zero.
pub fn days_since(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - updated_at).num_days().max(0)
}

/// Pure core of a sweep: age every pending ticket and pick the ones to warn
/// about. Non-pending tickets in `tickets` are ignored.
pub fn evaluate(
    tickets: &[Ticket],
    notified: &NotifiedSet,
    stale_after_days: i64,
    now: DateTime<Utc>,
) -> (Vec<PendingTicket>, Vec<StaleTicket>) {
    let mut pending = Vec::new();
    let mut warnings = Vec::new();

    for ticket in tickets.iter().filter(|t| t.is_pending()) {
        let days_pending = days_since(ticket.updated_at, now);
        if days_pending >= stale_after_days && !notified.contains(&ticket.id) {
            warnings.push(StaleTicket {
                ticket_id: ticket.id.clone(),
                subject: ticket.subject.clone(),
                days_pending,
            });
        }
        pending.push(PendingTicket {
            ticket_id: ticket.id.clone(),
            subject: ticket.subject.clone(),
            user_id: ticket.user_id.clone(),
            priority: ticket.priority,
            updated_at: ticket.updated_at,
            days_pending,
        });
    }

    (pending, warnings)
}

pub struct Watchdog {
    store: Arc<dyn TicketStore>,
    stale_after_days: i64,
    notified: NotifiedSet,
    persist_to: Option<PathBuf>,
}

impl Watchdog {
    pub fn new(store: Arc<dyn TicketStore>, stale_after_days: i64) -> Self {
        Self {
            store,
            stale_after_days,
            notified: NotifiedSet::new(),
            persist_to: None,
        }
    }

    /// Load the notified set from `path` and save it there after each sweep
    /// that changes it. An unreadable file starts an empty set.
    pub fn with_persistence(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.notified = match load_notified(&path) {
            Ok(set) => set,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "notified set unreadable, starting empty"
                );
                NotifiedSet::new()
            }
        };
        self.persist_to = Some(path);
        self
    }

    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    pub fn stale_after_days(&self) -> i64 {
        self.stale_after_days
    }

    /// Run one sweep against the store.
    ///
    /// On a fetch failure nothing is emitted and the notified set is left
    /// alone. After a successful fetch, ids that are no longer pending are
    /// dropped from the set; status never returns to pending, so they can
    /// not be warned about again.
    pub async fn sweep(&mut self, now: DateTime<Utc>) -> SweepReport {
        let tickets = match self.store.fetch_tickets(Some(TicketStatus::Pending)).await {
            Ok(tickets) => tickets,
            Err(e) => {
                warn!(error = %e, "watchdog sweep failed to fetch pending tickets");
                return SweepReport::failed(now, e);
            }
        };

        let before = self.notified.clone();
        let (pending, warnings) = evaluate(&tickets, &self.notified, self.stale_after_days, now);

        for stale in &warnings {
            warn!(
                ticket = %stale.ticket_id,
                subject = %stale.subject,
                days = stale.days_pending,
                "ticket pending past threshold"
            );
            self.notified.mark(stale.ticket_id.clone());
        }

        let pruned = self
            .notified
            .retain(|id| pending.iter().any(|p| &p.ticket_id == id));
        if pruned > 0 {
            debug!(pruned, "dropped resolved or assigned ids from notified set");
        }

        if self.notified != before {
            self.persist();
        }

        info!(
            pending = pending.len(),
            warnings = warnings.len(),
            notified = self.notified.len(),
            "watchdog sweep finished"
        );

        SweepReport {
            at: now,
            pending,
            warnings,
            error: None,
        }
    }

    fn persist(&self) {
        let Some(path) = &self.persist_to else {
            return;
        };
        if let Err(e) = save_notified(path, &self.notified) {
            warn!(path = %path.display(), error = %e, "failed to save notified set");
        }
    }

    /// Sweep immediately, then every `period`, until `cancel` fires.
    /// Each report is handed to `on_report`.
    pub fn spawn<F>(
        mut self,
        period: Duration,
        cancel: CancellationToken,
        on_report: F,
    ) -> JoinHandle<()>
    where
        F: Fn(SweepReport) + Send + 'static,
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                period_secs = period.as_secs(),
                threshold_days = self.stale_after_days,
                "watchdog started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let report = self.sweep(Utc::now()).await;
                        on_report(report);
                    }
                    _ = cancel.cancelled() => {
                        info!("watchdog shutting down");
                        break;
                    }
                }
            }
        })
    }
}

impl fmt::Debug for Watchdog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchdog")
            .field("store", &self.store.name())
            .field("stale_after_days", &self.stale_after_days)
            .field("notified", &self.notified.len())
            .field("persist_to", &self.persist_to)
            .finish()
    }
}
