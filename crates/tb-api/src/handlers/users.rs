//! Users API handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tb_core::traits::Id;
use tb_db::UserRepository;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

/// The acting user's profile
///
/// GET /api/v1/users/me
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;

    let row = UserRepository::new(pool.clone())
        .find_by_id(user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("User", user.id))?;

    Ok(Json(UserResponse {
        id: row.id,
        login: row.login,
        name: row.name,
        email: row.email,
        is_super_admin: row.is_super_admin,
        capabilities: user.capability_names(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    id: Id,
    login: String,
    name: String,
    email: String,
    is_super_admin: bool,
    capabilities: Vec<String>,
}
