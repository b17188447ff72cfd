//! API error handling
//!
//! Maps the core taxonomy onto HTTP statuses with a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tb_core::error::{BoardError, ValidationErrors};
use tb_notifications::InboxError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "permission_denied",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::NotFound { entity, value, .. } => ApiError::NotFound {
                resource: entity,
                id: value,
            },
            BoardError::PermissionDenied { message } => ApiError::Forbidden(message),
            BoardError::Unauthorized { message } => ApiError::Unauthorized(message),
            BoardError::Validation(errors) => ApiError::Validation(errors),
            BoardError::Database(msg) | BoardError::Internal(msg) | BoardError::Config(msg) => {
                ApiError::Internal(msg)
            }
            BoardError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<InboxError> for ApiError {
    fn from(err: InboxError) -> Self {
        match err {
            InboxError::NotFound(id) => ApiError::not_found("Notification", id),
            InboxError::Forbidden(msg) => ApiError::Forbidden(msg),
            InboxError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::NotFound { resource, id } => {
                format!("{} with id {} not found", resource, id)
            }
            ApiError::Validation(errors) => errors.full_messages().join(", "),
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg) => msg.clone(),
        };

        let body = ErrorBody {
            error: self.error_code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_mapping() {
        let err: ApiError = BoardError::not_found("Ticket", 7).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = BoardError::permission_denied("no").into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err: ApiError = BoardError::Validation(ValidationErrors::base("empty")).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_inbox_error_mapping() {
        let err: ApiError = InboxError::NotFound(3).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = InboxError::Forbidden("not yours".into()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
