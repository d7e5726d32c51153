use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ticket_desk::app::{handle_key, AppState, Command, InputMode, NoticeLevel, ViewState};
use ticket_desk::model::{Admin, Message, Ticket, TicketStatus};
use ticket_desk::store::MemoryStore;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(state: AppState, codes: &[KeyCode]) -> AppState {
    codes.iter().fold(state, |s, code| handle_key(s, key(*code)))
}

/// Ready inbox: two tickets, two admins, startup command queue cleared.
fn ready_state() -> AppState {
    let mut state = AppState::new(Arc::new(MemoryStore::new()));
    state.take_commands();
    state.inbox.set_admins(vec![Admin::new("A1", "Ana"), Admin::new("A2", "Luis")]);
    state.inbox.on_tickets_changed(vec![
        Ticket::new("T1", "U1", "Cannot login", Utc::now())
            .with_message(Message::user("It fails", Utc::now())),
        Ticket::new("T2", "U1", "Refund", Utc::now()).with_status(TicketStatus::Resolved),
    ]);
    state
}

#[test]
fn enter_opens_selected_ticket() {
    let state = press(ready_state(), &[KeyCode::Enter]);

    assert_eq!(state.view, ViewState::Detail);
    let detail = state.detail.as_ref().unwrap();
    assert_eq!(detail.ticket_id().as_str(), "T1");
    assert_eq!(detail.ticket().unwrap().subject, "Cannot login");
}

#[test]
fn esc_returns_to_inbox() {
    let state = press(ready_state(), &[KeyCode::Enter, KeyCode::Esc]);
    assert_eq!(state.view, ViewState::Inbox);
    assert!(state.detail.is_none());
}

#[test]
fn enter_on_empty_inbox_stays() {
    let mut state = AppState::new(Arc::new(MemoryStore::new()));
    state.inbox.on_tickets_changed(Vec::new());
    let state = press(state, &[KeyCode::Enter]);
    assert_eq!(state.view, ViewState::Inbox);
}

#[test]
fn picker_assigns_chosen_admin() {
    let state = press(
        ready_state(),
        &[KeyCode::Char('a'), KeyCode::Char('j'), KeyCode::Enter],
    );

    assert_eq!(state.mode, InputMode::Normal);
    assert_eq!(
        state.pending_commands,
        vec![Command::Assign {
            ticket_id: "T1".into(),
            admin_id: "A2".into(),
        }]
    );
}

#[test]
fn picker_selection_is_bounded() {
    let state = press(
        ready_state(),
        &[
            KeyCode::Char('a'),
            KeyCode::Char('j'),
            KeyCode::Char('j'),
            KeyCode::Char('j'),
        ],
    );
    assert_eq!(
        state.mode,
        InputMode::AdminPicker {
            ticket_id: "T1".into(),
            selected: 1
        }
    );
}

#[test]
fn picker_escape_queues_nothing() {
    let state = press(ready_state(), &[KeyCode::Char('a'), KeyCode::Esc]);
    assert_eq!(state.mode, InputMode::Normal);
    assert!(state.pending_commands.is_empty());
}

#[test]
fn picker_needs_loaded_admins() {
    let mut state = AppState::new(Arc::new(MemoryStore::new()));
    state.inbox.on_tickets_changed(vec![Ticket::new("T1", "U1", "Cannot login", Utc::now())]);

    let state = press(state, &[KeyCode::Char('a')]);

    assert_eq!(state.mode, InputMode::Normal);
    assert_eq!(state.latest_notice().unwrap().level, NoticeLevel::Warning);
}

#[test]
fn compose_and_send_queues_message() {
    let mut keys = vec![KeyCode::Enter, KeyCode::Char('i')];
    keys.extend("Hi!x".chars().map(KeyCode::Char));
    keys.push(KeyCode::Backspace);
    keys.push(KeyCode::Enter);

    let state = press(ready_state(), &keys);

    assert_eq!(state.mode, InputMode::Normal);
    assert_eq!(
        state.pending_commands,
        vec![Command::SendMessage {
            ticket_id: "T1".into(),
            text: "Hi!".into(),
        }]
    );
}

#[test]
fn compose_swallows_navigation_keys() {
    let state = press(
        ready_state(),
        &[KeyCode::Enter, KeyCode::Char('i'), KeyCode::Char('q'), KeyCode::Char('x')],
    );
    assert!(!state.should_quit);
    assert!(state.pending_commands.is_empty());
    assert_eq!(state.mode, InputMode::Compose("qx".into()));
}

#[test]
fn compose_escape_discards_draft() {
    let state = press(
        ready_state(),
        &[KeyCode::Enter, KeyCode::Char('i'), KeyCode::Char('h'), KeyCode::Esc],
    );
    assert_eq!(state.mode, InputMode::Normal);
    assert!(state.pending_commands.is_empty());
}

#[test]
fn resolved_ticket_cannot_be_replied_to() {
    let state = press(
        ready_state(),
        &[KeyCode::Char('j'), KeyCode::Enter, KeyCode::Char('i')],
    );
    assert_eq!(state.mode, InputMode::Normal);
    assert_eq!(state.latest_notice().unwrap().text, "ticket is resolved");
}

#[test]
fn x_in_detail_queues_resolve() {
    let state = press(ready_state(), &[KeyCode::Enter, KeyCode::Char('x')]);
    assert_eq!(
        state.pending_commands,
        vec![Command::MarkResolved {
            ticket_id: "T1".into()
        }]
    );
}

#[test]
fn r_reloads_admins_and_users() {
    let state = press(ready_state(), &[KeyCode::Char('r')]);
    assert_eq!(
        state.pending_commands,
        vec![Command::LoadAdmins, Command::LoadUsers]
    );
}

#[test]
fn ctrl_c_quits_from_any_mode() {
    let state = press(ready_state(), &[KeyCode::Enter, KeyCode::Char('i')]);
    let state = handle_key(state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(state.should_quit);
}
