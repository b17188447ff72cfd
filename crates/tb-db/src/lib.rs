//! # tb-db
//!
//! PostgreSQL persistence for TicketBoard RS: connection pooling and one
//! repository per aggregate, plus the Pg-backed notification store.

pub mod notifications;
pub mod pool;
pub mod priorities;
pub mod projects;
pub mod repository;
pub mod ticket_statuses;
pub mod tickets;
pub mod users;

pub use notifications::PgNotificationStore;
pub use pool::{Database, DatabaseConfig};
pub use priorities::{PriorityRepository, PriorityRow};
pub use projects::{ProjectRepository, ProjectRow};
pub use repository::{RepositoryError, RepositoryResult};
pub use ticket_statuses::{TicketStatusRepository, TicketStatusRow};
pub use tickets::{TicketRepository, TicketRow};
pub use users::{UserRepository, UserRow};
