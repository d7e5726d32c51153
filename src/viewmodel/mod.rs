//! View-models of the ticket workflow. Each holds an injected
//! `Arc<dyn TicketStore>` and the slice of state its screen needs.

pub mod detail;
pub mod inbox;

pub use detail::TicketDetailViewModel;
pub use inbox::{AssignOutcome, InboxPhase, InboxViewModel, Navigation, UNKNOWN_USER};
