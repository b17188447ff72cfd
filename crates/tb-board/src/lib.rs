//! # tb-board
//!
//! Kanban board domain logic: the closed set of per-column sort strategies,
//! board assembly from a project's statuses and tickets, and the validated
//! move-ticket transition.

pub mod board;
pub mod mover;
pub mod sort;

pub use board::{Board, BoardColumn, SortPreferences};
pub use mover::{MoveTicket, TicketMove};
pub use sort::TicketSort;
