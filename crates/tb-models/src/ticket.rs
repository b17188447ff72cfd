//! Ticket model
//!
//! Table: tickets (assignees via ticket_assignees join table)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::{Entity, Id, Identifiable, ProjectScoped, Timestamped};
use validator::Validate;

/// Ticket entity
///
/// The central record of the board: belongs to a project and one of that
/// project's statuses, is owned by the user who created it, and may be
/// assigned to any number of users.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub description: Option<String>,

    /// Owning project
    pub project_id: Id,

    /// Current status; must belong to `project_id`
    pub ticket_status_id: Id,

    /// Creator / owner
    pub user_id: Id,

    pub priority_id: Option<Id>,

    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,

    /// Assigned user ids
    #[serde(default)]
    pub assignee_ids: Vec<Id>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            project_id: 0,
            ticket_status_id: 0,
            user_id: 0,
            priority_id: None,
            start_date: None,
            due_date: None,
            assignee_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Ticket {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Ticket {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl ProjectScoped for Ticket {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Ticket {
    const TABLE_NAME: &'static str = "tickets";
    const TYPE_NAME: &'static str = "Ticket";
}

impl Ticket {
    /// Create a new ticket
    pub fn new(
        name: impl Into<String>,
        project_id: Id,
        ticket_status_id: Id,
        user_id: Id,
    ) -> Self {
        Self {
            name: name.into(),
            project_id,
            ticket_status_id,
            user_id,
            ..Default::default()
        }
    }

    /// Check whether a user is among the assignees
    pub fn is_assigned_to(&self, user_id: Id) -> bool {
        self.assignee_ids.contains(&user_id)
    }

    /// Check whether a user owns (created) the ticket
    pub fn is_owned_by(&self, user_id: Id) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_new() {
        let ticket = Ticket::new("Fix login redirect", 1, 10, 7);
        assert_eq!(ticket.project_id, 1);
        assert_eq!(ticket.ticket_status_id, 10);
        assert!(ticket.is_owned_by(7));
        assert!(!ticket.is_assigned_to(7));
    }

    #[test]
    fn test_assignment_check() {
        let mut ticket = Ticket::new("Review PR", 1, 10, 7);
        ticket.assignee_ids = vec![3, 5];
        assert!(ticket.is_assigned_to(3));
        assert!(!ticket.is_assigned_to(4));
    }
}
