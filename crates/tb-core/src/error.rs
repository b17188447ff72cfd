//! Core error types for TicketBoard RS
//!
//! One taxonomy shared by every layer: repositories wrap their failures into
//! `Database`, services reject with `NotFound`/`PermissionDenied`/`Validation`,
//! and the API maps each variant onto an HTTP status.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all board operations
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoardError {
    /// Shorthand for a `NotFound` on an entity's primary key.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        BoardError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        BoardError::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            BoardError::NotFound { .. } => 404,
            BoardError::Unauthorized { .. } => 401,
            BoardError::PermissionDenied { .. } => 403,
            BoardError::Validation(_) => 422,
            BoardError::Database(_) | BoardError::Internal(_) | BoardError::Config(_) => 500,
            BoardError::Storage(_) => 502,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BoardError::NotFound { .. } => "not_found",
            BoardError::Unauthorized { .. } => "unauthorized",
            BoardError::PermissionDenied { .. } => "permission_denied",
            BoardError::Validation(_) => "validation_failed",
            BoardError::Database(_) => "database_error",
            BoardError::Storage(_) => "storage_error",
            BoardError::Config(_) => "configuration_error",
            BoardError::Internal(_) => "internal_error",
        }
    }
}

/// Validation errors collection
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a one-message error bag in a single call.
    pub fn base(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add_base(message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BoardError::not_found("Ticket", 1).status_code(), 404);
        assert_eq!(
            BoardError::permission_denied("no").status_code(),
            403
        );
        assert_eq!(
            BoardError::Validation(ValidationErrors::base("empty")).status_code(),
            422
        );
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("name", "is required");

        let mut b = ValidationErrors::new();
        b.add("name", "is too long");
        b.add_base("something else");

        a.merge(b);
        assert_eq!(a.get("name").map(Vec::len), Some(2));
        assert_eq!(a.base_errors.len(), 1);
    }

    #[test]
    fn test_full_messages() {
        let mut errors = ValidationErrors::base("columns must not be empty");
        errors.add("due_date", "is invalid");

        let messages = errors.full_messages();
        assert!(messages.contains(&"columns must not be empty".to_string()));
        assert!(messages.contains(&"due_date is invalid".to_string()));
    }
}
