//! Demo store contents for `ticket-desk seed`.

use chrono::{DateTime, Duration, Utc};

use crate::model::{Assignee, Message, Ticket, TicketPriority, TicketStatus, User};

use super::StoreDocument;

/// Two admins, one regular user, and tickets in every status. One pending
/// ticket is old enough to trip the default stale threshold.
pub fn demo_document(now: DateTime<Utc>) -> StoreDocument {
    let opened = now - Duration::days(3);

    let stale = Ticket::new("T-0001", "U1", "Cannot login", opened)
        .with_description("The app rejects my password since the last update.")
        .with_priority(TicketPriority::High)
        .with_message(Message::user("I tried resetting it twice.", opened));

    let fresh = Ticket::new(
        "T-0002",
        "U1",
        "Reminder notifications arrive late",
        now - Duration::hours(2),
    )
    .with_description("Daily reflection reminder shows up an hour after the set time.");

    let mut assigned = Ticket::new("T-0003", "U1", "Export to PDF cuts entries", opened)
        .with_description("Long journal entries are truncated in the PDF export.")
        .with_priority(TicketPriority::Low)
        .with_updated_at(now - Duration::days(1));
    assigned.assign(Assignee {
        admin_id: "A2".into(),
        admin_name: "Luis".into(),
    });

    let refunded_at = now - Duration::days(9);
    let resolved = Ticket::new(
        "T-0004",
        "U1",
        "Charged twice for subscription",
        now - Duration::days(10),
    )
    .with_description("Two charges appeared on my card this month.")
    .with_status(TicketStatus::Resolved)
    .with_message(Message::admin("The duplicate charge has been refunded.", refunded_at))
    .with_updated_at(refunded_at);

    StoreDocument::new()
        .with_user("A1", User::admin("Ana"))
        .with_user("A2", User::admin("Luis"))
        .with_user("U1", User::regular("Marta"))
        .with_ticket(stale)
        .with_ticket(fresh)
        .with_ticket(assigned)
        .with_ticket(resolved)
}
