use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ticket_desk::app::{execute, update, AppState, Command, NoticeLevel, ViewState};
use ticket_desk::error::TicketError;
use ticket_desk::event::AppEvent;
use ticket_desk::model::{Admin, Ticket, TicketStatus, User, UserId};
use ticket_desk::store::{MemoryStore, TicketStore};
use ticket_desk::watchdog::{PendingTicket, StaleTicket, SweepReport};

fn ticket(id: &str) -> Ticket {
    Ticket::new(id, "U1", format!("Subject {id}"), Utc::now())
}

fn enter() -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

#[test]
fn tickets_changed_refreshes_open_detail() {
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let state = update(state, AppEvent::TicketsChanged(vec![ticket("T1")]));
    let state = update(state, enter());
    assert_eq!(state.view, ViewState::Detail);

    let resolved = ticket("T1").with_status(TicketStatus::Resolved);
    let state = update(state, AppEvent::TicketsChanged(vec![resolved]));

    let detail = state.detail.as_ref().unwrap();
    assert_eq!(detail.ticket().unwrap().status, TicketStatus::Resolved);
}

#[test]
fn deleted_ticket_leaves_placeholder_and_notice() {
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let state = update(state, AppEvent::TicketsChanged(vec![ticket("T1")]));
    let state = update(state, enter());

    let state = update(state, AppEvent::TicketsChanged(Vec::new()));

    assert_eq!(state.view, ViewState::Detail);
    assert!(state.detail.as_ref().unwrap().ticket().is_none());
    assert_eq!(state.latest_notice().unwrap().text, "ticket T1 no longer exists");
}

#[test]
fn admins_loaded_completes_loading() {
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let state = update(state, AppEvent::TicketsChanged(Vec::new()));
    let state = update(state, AppEvent::AdminsLoaded(vec![Admin::new("A1", "Ana")]));
    assert_eq!(state.inbox.admins().len(), 1);
    assert_eq!(state.inbox.phase(), ticket_desk::viewmodel::InboxPhase::Ready);
}

#[test]
fn sweep_report_updates_pending_panel_and_warns() {
    let now = Utc::now();
    let report = SweepReport {
        at: now,
        pending: vec![PendingTicket {
            ticket_id: "T1".into(),
            subject: "Cannot login".into(),
            user_id: "U1".into(),
            priority: Default::default(),
            updated_at: now - Duration::days(2),
            days_pending: 2,
        }],
        warnings: vec![StaleTicket {
            ticket_id: "T1".into(),
            subject: "Cannot login".into(),
            days_pending: 2,
        }],
        error: None,
    };

    let state = update(
        AppState::new(Arc::new(MemoryStore::new())),
        AppEvent::SweepCompleted(report),
    );

    assert_eq!(state.stale.len(), 1);
    assert_eq!(state.last_sweep, Some(now));
    let notice = state.latest_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.text.contains("Cannot login"));
}

#[test]
fn users_loaded_fills_creator_names() {
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let names = BTreeMap::from([(UserId::new("U1"), "Marta".to_string())]);

    let state = update(state, AppEvent::UsersLoaded(names));

    assert_eq!(state.inbox.creator_name(&"U1".into()), "Marta");
}

#[test]
fn tick_advances_clock() {
    let later = Utc::now() + Duration::minutes(5);
    let state = update(AppState::new(Arc::new(MemoryStore::new())), AppEvent::Tick(later));
    assert_eq!(state.now, later);
}

// ============================================================================
// Command execution against a MemoryStore
// ============================================================================

fn scenario_state() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    store.insert_user("A1", User::admin("Ana"));
    store.insert_user("U1", User::regular("Marta"));
    store.insert_ticket(ticket("T1"));
    let state = AppState::new(store.clone());
    (store, state)
}

#[tokio::test]
async fn load_admins_command_yields_admins_loaded() {
    let (_store, state) = scenario_state();
    match execute(Command::LoadAdmins, state.inbox.clone()).await {
        AppEvent::AdminsLoaded(admins) => assert_eq!(admins, vec![Admin::new("A1", "Ana")]),
        other => panic!("expected AdminsLoaded, got {other:?}"),
    }
}

#[tokio::test]
async fn load_users_command_yields_display_names() {
    let (_store, state) = scenario_state();
    match execute(Command::LoadUsers, state.inbox.clone()).await {
        AppEvent::UsersLoaded(names) => {
            assert_eq!(names.len(), 2);
            assert_eq!(names[&UserId::new("U1")], "Marta");
        }
        other => panic!("expected UsersLoaded, got {other:?}"),
    }
}

#[tokio::test]
async fn assign_command_reports_admin_name() {
    let (store, mut state) = scenario_state();
    state.inbox.set_admins(store.list_admins().await.unwrap());

    let event = execute(
        Command::Assign {
            ticket_id: "T1".into(),
            admin_id: "A1".into(),
        },
        state.inbox.clone(),
    )
    .await;

    match event {
        AppEvent::CommandSucceeded(text) => assert_eq!(text, "ticket T1 assigned to Ana"),
        other => panic!("expected CommandSucceeded, got {other:?}"),
    }
    assert_eq!(store.ticket(&"T1".into()).unwrap().status, TicketStatus::Assigned);
}

#[tokio::test]
async fn assign_command_with_unknown_admin_is_rejected() {
    let (store, state) = scenario_state();
    let event = execute(
        Command::Assign {
            ticket_id: "T1".into(),
            admin_id: "A1".into(),
        },
        state.inbox.clone(),
    )
    .await;

    // admins never loaded into the inbox
    assert!(matches!(event, AppEvent::CommandRejected(_)));
    assert_eq!(store.ticket(&"T1".into()).unwrap().status, TicketStatus::Pending);
}

#[tokio::test]
async fn send_command_uses_inbox_snapshot() {
    let (store, mut state) = scenario_state();
    state.inbox.on_tickets_changed(store.fetch_tickets(None).await.unwrap());

    let event = execute(
        Command::SendMessage {
            ticket_id: "T1".into(),
            text: "Please check your network".into(),
        },
        state.inbox.clone(),
    )
    .await;

    assert!(matches!(event, AppEvent::CommandSucceeded(_)));
    assert_eq!(store.ticket(&"T1".into()).unwrap().messages.len(), 1);
}

#[tokio::test]
async fn store_failure_becomes_error_event() {
    let (store, state) = scenario_state();
    store.fail_next_with(TicketError::Store("offline".into()));

    let event = execute(
        Command::MarkResolved {
            ticket_id: "T1".into(),
        },
        state.inbox.clone(),
    )
    .await;

    let state = update(state, event);
    let notice = state.latest_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "resolve: store: offline");
}
