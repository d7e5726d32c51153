pub mod admin;
pub mod ids;
pub mod theme;
pub mod ticket;

pub use admin::{Admin, Role, User};
pub use ids::{AdminId, TicketId, UserId};
pub use theme::Theme;
pub use ticket::{
    Assignee, Message, MessageSender, NewTicket, Ticket, TicketPriority, TicketStatus,
};
