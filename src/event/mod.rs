use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;

use crate::error::AppError;
use crate::model::{Admin, Ticket, UserId};
use crate::watchdog::SweepReport;

/// All events that can occur in the application.
/// Sourced from the store subscription, keyboard input, timers, the
/// watchdog task and finished store commands.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Full ticket list delivered by the live subscription
    TicketsChanged(Vec<Ticket>),

    /// Admin list fetched from the store
    AdminsLoaded(Vec<Admin>),

    /// User display names fetched from the store
    UsersLoaded(BTreeMap<UserId, String>),

    /// Keyboard input event
    Key(KeyEvent),

    /// Timer tick (ages in the inbox are computed against it)
    Tick(DateTime<Utc>),

    /// Watchdog sweep finished
    SweepCompleted(SweepReport),

    /// Store command finished; the text is shown as a notice
    CommandSucceeded(String),

    /// Store command was not sent (e.g. unknown admin)
    CommandRejected(String),

    /// Store command failed (non-fatal)
    Error { source: String, error: AppError },
}
