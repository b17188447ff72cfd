//! Timeline API handler

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tb_core::traits::Id;
use tb_db::{TicketRepository, TicketStatusRepository};
use tb_timeline::build_timeline;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};
use crate::handlers::visible_project;

/// Derive a project's Gantt timeline
///
/// GET /api/v1/projects/:id/timeline
pub async fn get_timeline(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    visible_project(&state, &user, project_id).await?;
    let pool = state.pool()?;

    let statuses: Vec<_> = TicketStatusRepository::new(pool.clone())
        .find_for_project(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .into_iter()
        .map(|row| row.into_model())
        .collect();

    let tickets = TicketRepository::new(pool.clone())
        .find_with_due_dates(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let timeline = build_timeline(&statuses, &tickets, Utc::now().date_naive());

    Ok(Json(timeline))
}
