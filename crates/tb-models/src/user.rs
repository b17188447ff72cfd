//! User model
//!
//! Table: users (project membership via project_members join table)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::{Entity, Id, Identifiable, Timestamped};
use validator::Validate;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<Id>,

    #[validate(length(min = 1, max = 100))]
    pub login: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    /// Super admins bypass ownership and assignment checks everywhere.
    #[serde(default)]
    pub is_super_admin: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: None,
            login: String::new(),
            name: String::new(),
            email: String::new(),
            is_super_admin: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Entity for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}

impl User {
    pub fn new(login: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new("jdoe", "Jane Doe", "jdoe@example.com");
        assert_eq!(user.login, "jdoe");
        assert!(!user.is_super_admin);
    }
}
