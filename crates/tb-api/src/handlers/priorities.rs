//! Priorities API handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tb_core::traits::Id;
use tb_db::PriorityRepository;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

/// List the selectable priorities, most urgent first
///
/// GET /api/v1/priorities
pub async fn list_priorities(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;

    let rows = PriorityRepository::new(pool.clone())
        .find_all()
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let priorities: Vec<PriorityResponse> = rows
        .into_iter()
        .map(|row| PriorityResponse {
            id: row.id,
            name: row.name,
            position: row.position,
        })
        .collect();

    Ok(Json(priorities))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PriorityResponse {
    id: Id,
    name: String,
    position: i32,
}
