//! Imperative shell for [`Command`]s queued by `update`.

use crate::app::state::Command;
use crate::error::TicketError;
use crate::event::AppEvent;
use crate::model::TicketId;
use crate::viewmodel::{AssignOutcome, InboxViewModel, TicketDetailViewModel};

/// Run one store command against a snapshot of the inbox and report the
/// result as an event. The store's own delivery carries the state change;
/// the returned event only feeds the notice line (or the admin list).
pub async fn execute(command: Command, inbox: InboxViewModel) -> AppEvent {
    match command {
        Command::LoadAdmins => match inbox.fetch_admins().await {
            Ok(admins) => AppEvent::AdminsLoaded(admins),
            Err(e) => failed("load admins", e),
        },

        Command::LoadUsers => match inbox.fetch_user_names().await {
            Ok(user_names) => AppEvent::UsersLoaded(user_names),
            Err(e) => failed("load users", e),
        },

        Command::Assign { ticket_id, admin_id } => {
            match inbox.assign_ticket(&ticket_id, &admin_id).await {
                Ok(AssignOutcome::Assigned) => {
                    let name = inbox
                        .admin(&admin_id)
                        .map_or(admin_id.as_str(), |a| a.display_name.as_str());
                    AppEvent::CommandSucceeded(format!("ticket {ticket_id} assigned to {name}"))
                }
                Ok(AssignOutcome::UnknownAdmin) => {
                    AppEvent::CommandRejected(format!("unknown admin {admin_id}, nothing assigned"))
                }
                Err(e) => failed("assign", e),
            }
        }

        Command::SendMessage { ticket_id, text } => {
            let detail = detail_for(&inbox, ticket_id.clone());
            match detail.send_message(&text).await {
                Ok(_) => AppEvent::CommandSucceeded(format!("reply sent on ticket {ticket_id}")),
                Err(e) => failed("send message", e),
            }
        }

        Command::MarkResolved { ticket_id } => {
            let detail = detail_for(&inbox, ticket_id.clone());
            match detail.mark_resolved().await {
                Ok(()) => AppEvent::CommandSucceeded(format!("ticket {ticket_id} resolved")),
                Err(e) => failed("resolve", e),
            }
        }
    }
}

fn detail_for(inbox: &InboxViewModel, ticket_id: TicketId) -> TicketDetailViewModel {
    TicketDetailViewModel::with_tickets(inbox.store().clone(), ticket_id, inbox.tickets())
}

fn failed(source: &str, error: TicketError) -> AppEvent {
    AppEvent::Error {
        source: source.to_string(),
        error: error.into(),
    }
}
