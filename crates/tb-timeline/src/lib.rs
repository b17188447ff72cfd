//! # tb-timeline
//!
//! Derives Gantt task records from a project's tickets: synthetic start
//! dates, a coarse progress percentage from status position, and overdue
//! highlighting. Derivation is pure; the caller supplies loaded rows and the
//! current time.

pub mod builder;
pub mod task;

pub use builder::{build_timeline, Timeline};
pub use task::TimelineTask;
