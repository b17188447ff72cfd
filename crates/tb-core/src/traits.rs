//! Core traits shared across the workspace

use chrono::{DateTime, Utc};

/// Primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Option<Id>;
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities with timestamps (created_at, updated_at)
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities that belong to a project
pub trait ProjectScoped {
    fn project_id(&self) -> Id;
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Timestamped + Send + Sync {
    /// The database table name
    const TABLE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}

/// Identity context for permission checks.
///
/// Implemented by `tb-auth`'s `CurrentUser`; services take `&dyn UserContext`
/// (or a generic bound) so tests can supply hand-rolled mocks.
pub trait UserContext: Send + Sync {
    fn user_id(&self) -> Id;
    fn is_super_admin(&self) -> bool;
    /// Check membership of a named capability (typed checks live in tb-auth;
    /// this is the seam lower layers see).
    fn has_capability(&self, capability: &str) -> bool;
    /// Check project membership
    fn member_of(&self, project_id: Id) -> bool;
}
