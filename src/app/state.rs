use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{AdminId, Ticket, TicketId};
use crate::store::TicketStore;
use crate::viewmodel::{InboxViewModel, TicketDetailViewModel};
use crate::watchdog::PendingTicket;

/// Capacity of the notice ring buffer.
pub const MAX_NOTICES: usize = 100;

/// Main application state.
/// Updated via pure `update(state, event) -> state` function.
/// Store side effects are queued in `pending_commands` and executed by the
/// event loop.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current view
    pub view: ViewState,

    /// Live ticket list and admins
    pub inbox: InboxViewModel,

    /// Open ticket (Some while `view` is `Detail`)
    pub detail: Option<TicketDetailViewModel>,

    /// Modal input on top of the current view
    pub mode: InputMode,

    /// Index of the selected row in the inbox
    pub selected_index: usize,

    /// Scroll offset of the message thread in the detail view
    pub thread_scroll: usize,

    /// Show help overlay
    pub show_help: bool,

    /// Pending tickets from the last watchdog sweep
    pub stale: Vec<PendingTicket>,

    /// Time of the last watchdog sweep
    pub last_sweep: Option<DateTime<Utc>>,

    /// Notice ring buffer (max MAX_NOTICES), newest last
    pub notices: VecDeque<Notice>,

    /// Store commands waiting to be run by the event loop
    pub pending_commands: Vec<Command>,

    /// Wall clock of the last tick
    pub now: DateTime<Utc>,

    /// Signal to quit the application
    pub should_quit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Inbox,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Choosing an assignee for `ticket_id`
    AdminPicker { ticket_id: TicketId, selected: usize },
    /// Typing a reply in the detail view
    Compose(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub at: DateTime<Utc>,
    pub level: NoticeLevel,
    pub text: String,
}

/// Store side effect requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadAdmins,
    LoadUsers,
    Assign {
        ticket_id: TicketId,
        admin_id: AdminId,
    },
    SendMessage {
        ticket_id: TicketId,
        text: String,
    },
    MarkResolved {
        ticket_id: TicketId,
    },
}

impl AppState {
    /// Fresh state for `store`. Admins and user names are requested right away.
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self {
            view: ViewState::Inbox,
            inbox: InboxViewModel::new(store),
            detail: None,
            mode: InputMode::Normal,
            selected_index: 0,
            thread_scroll: 0,
            show_help: false,
            stale: Vec::new(),
            last_sweep: None,
            notices: VecDeque::with_capacity(MAX_NOTICES),
            pending_commands: vec![Command::LoadAdmins, Command::LoadUsers],
            now: Utc::now(),
            should_quit: false,
        }
    }

    pub fn selected_ticket(&self) -> Option<&Ticket> {
        self.inbox.tickets().get(self.selected_index)
    }

    /// Ticket the user is acting on: the open one in the detail view, the
    /// selected row in the inbox.
    pub fn current_ticket(&self) -> Option<&Ticket> {
        match self.view {
            ViewState::Inbox => self.selected_ticket(),
            ViewState::Detail => self.detail.as_ref().and_then(|d| d.ticket()),
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            at: self.now,
            level,
            text: text.into(),
        });
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending_commands)
    }
}
