//! Priority model
//!
//! Table: priorities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// Ticket priority entity
///
/// Priorities define urgency levels; lower ids sort first on the board, and a
/// missing priority sorts last.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Sort position (lower = more urgent)
    #[serde(default)]
    pub position: i32,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Priority {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            position: 0,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for Priority {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Priority {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for Priority {
    const TABLE_NAME: &'static str = "priorities";
    const TYPE_NAME: &'static str = "Priority";
}

impl Priority {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Standard priority names
    pub const LOW: &'static str = "Low";
    pub const NORMAL: &'static str = "Normal";
    pub const HIGH: &'static str = "High";
    pub const URGENT: &'static str = "Urgent";
}
