//! Project model
//!
//! Table: projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Project entity
///
/// A project owns an ordered set of ticket statuses and the tickets grouped
/// under them; users gain board access through project membership.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Project name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// URL-safe identifier (unique)
    #[validate(length(min = 1, max = 100))]
    pub identifier: String,

    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            identifier: String::new(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Project {
    const TABLE_NAME: &'static str = "projects";
    const TYPE_NAME: &'static str = "Project";
}

impl Project {
    /// Create a new project
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_new() {
        let project = Project::new("Website Relaunch", "website-relaunch");
        assert_eq!(project.name, "Website Relaunch");
        assert!(project.is_new_record());
    }
}
