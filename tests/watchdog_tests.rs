use std::sync::{mpsc, Arc};
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tempfile::TempDir;
use ticket_desk::error::TicketError;
use ticket_desk::model::{Ticket, TicketStatus};
use ticket_desk::store::{MemoryStore, TicketStore};
use ticket_desk::watchdog::{load_notified, Watchdog};
use tokio_util::sync::CancellationToken;

fn store_with_stale_ticket() -> Arc<MemoryStore> {
    let now = Utc::now();
    let store = Arc::new(MemoryStore::new());
    store.insert_ticket(Ticket::new("T1", "U1", "Cannot login", now - ChronoDuration::hours(30)));
    store.insert_ticket(Ticket::new("T2", "U1", "Slow sync", now - ChronoDuration::hours(2)));
    store.insert_ticket(
        Ticket::new("T3", "U1", "Old but done", now - ChronoDuration::days(9))
            .with_status(TicketStatus::Resolved),
    );
    store
}

#[tokio::test]
async fn first_sweep_warns_once_per_stale_ticket() {
    let store = store_with_stale_ticket();
    let mut watchdog = Watchdog::new(store.clone(), 1);

    let report = watchdog.sweep(Utc::now()).await;

    assert!(report.error.is_none());
    assert_eq!(report.pending.len(), 2);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].ticket_id.as_str(), "T1");
    assert_eq!(report.warnings[0].days_pending, 1);
    assert!(watchdog.notified().contains(&"T1".into()));
}

#[tokio::test]
async fn second_sweep_does_not_repeat_warning() {
    let store = store_with_stale_ticket();
    let mut watchdog = Watchdog::new(store.clone(), 1);

    watchdog.sweep(Utc::now()).await;
    let report = watchdog.sweep(Utc::now() + ChronoDuration::days(1)).await;

    // T2 crossed the threshold in the meantime; T1 stays quiet
    let warned: Vec<&str> = report.warnings.iter().map(|w| w.ticket_id.as_str()).collect();
    assert_eq!(warned, ["T2"]);
}

#[tokio::test]
async fn failed_fetch_emits_nothing_and_keeps_set() {
    let store = store_with_stale_ticket();
    let mut watchdog = Watchdog::new(store.clone(), 1);
    watchdog.sweep(Utc::now()).await;

    store.fail_next_with(TicketError::Store("offline".into()));
    let report = watchdog.sweep(Utc::now()).await;

    assert_eq!(report.error, Some(TicketError::Store("offline".into())));
    assert!(report.pending.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(watchdog.notified().len(), 1);
}

#[tokio::test]
async fn resolved_tickets_are_pruned_from_notified_set() {
    let store = store_with_stale_ticket();
    let mut watchdog = Watchdog::new(store.clone(), 1);
    watchdog.sweep(Utc::now()).await;
    assert!(watchdog.notified().contains(&"T1".into()));

    store.assign(&"T1".into(), &"A1".into(), "Ana").await.unwrap();
    watchdog.sweep(Utc::now()).await;

    assert!(watchdog.notified().is_empty());
}

#[tokio::test]
async fn notified_set_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notified.json");
    let store = store_with_stale_ticket();

    let mut first_run = Watchdog::new(store.clone(), 1).with_persistence(&path);
    assert_eq!(first_run.sweep(Utc::now()).await.warnings.len(), 1);
    assert!(load_notified(&path).unwrap().contains(&"T1".into()));

    let mut second_run = Watchdog::new(store.clone(), 1).with_persistence(&path);
    assert!(second_run.sweep(Utc::now()).await.warnings.is_empty());
}

#[tokio::test]
async fn corrupt_notified_file_starts_empty() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notified.json");
    std::fs::write(&path, "{broken").unwrap();

    let mut watchdog = Watchdog::new(store_with_stale_ticket(), 1).with_persistence(&path);
    assert!(watchdog.notified().is_empty());

    assert_eq!(watchdog.sweep(Utc::now()).await.warnings.len(), 1);
    assert!(load_notified(&path).unwrap().contains(&"T1".into()));
}

#[tokio::test]
async fn threshold_is_configurable() {
    let mut watchdog = Watchdog::new(store_with_stale_ticket(), 2);
    assert!(watchdog.sweep(Utc::now()).await.warnings.is_empty());
}

#[tokio::test]
async fn spawned_watchdog_sweeps_immediately_and_stops_on_cancel() {
    let store: Arc<dyn TicketStore> = store_with_stale_ticket();
    let (tx, rx) = mpsc::channel();
    let cancel = CancellationToken::new();

    let watchdog = Watchdog::new(store, 1);
    let handle = watchdog.spawn(Duration::from_secs(3600), cancel.clone(), move |report| {
        let _ = tx.send(report);
    });

    let report = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.warnings.len(), 1);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}
