//! # tb-models
//!
//! Domain entities for TicketBoard RS: projects, ticket statuses, tickets,
//! priorities, and users.

pub mod priority;
pub mod project;
pub mod ticket;
pub mod ticket_status;
pub mod user;

pub use priority::Priority;
pub use project::Project;
pub use ticket::Ticket;
pub use ticket_status::TicketStatus;
pub use user::User;
