//! Ticket status model
//!
//! Table: ticket_statuses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::{Entity, Id, Identifiable, ProjectScoped, Timestamped};
use validator::Validate;

/// Ticket status entity
///
/// Statuses are the ordered columns of a project's board (Backlog, In
/// Progress, Done, ...). Unlike a global status table, each status belongs to
/// exactly one project; a ticket may only ever reference a status of its own
/// project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatus {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    /// Status name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Column color as hex code (e.g. "#3b82f6")
    pub color: Option<String>,

    /// Rank within the project; ascending order defines the board's columns
    /// left to right and the timeline's progress scale.
    #[serde(default)]
    pub sort_order: i32,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self {
            id: None,
            project_id: 0,
            name: String::new(),
            color: None,
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for TicketStatus {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for TicketStatus {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl ProjectScoped for TicketStatus {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for TicketStatus {
    const TABLE_NAME: &'static str = "ticket_statuses";
    const TYPE_NAME: &'static str = "TicketStatus";
}

impl TicketStatus {
    /// Create a new status
    pub fn new(project_id: Id, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Common status names
    pub const BACKLOG: &'static str = "Backlog";
    pub const IN_PROGRESS: &'static str = "In Progress";
    pub const REVIEW: &'static str = "Review";
    pub const DONE: &'static str = "Done";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_new() {
        let status = TicketStatus::new(1, "In Progress");
        assert_eq!(status.name, "In Progress");
        assert_eq!(status.project_id, 1);
        assert_eq!(status.sort_order, 0);
    }
}
