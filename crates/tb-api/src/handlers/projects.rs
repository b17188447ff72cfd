//! Projects API handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tb_core::traits::Id;
use tb_db::ProjectRepository;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

/// List projects visible to the caller
///
/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let rows = if user.is_super_admin {
        repo.find_all().await
    } else {
        repo.find_for_member(user.id).await
    }
    .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let projects: Vec<ProjectResponse> = rows
        .into_iter()
        .map(|row| ProjectResponse {
            id: row.id,
            name: row.name,
            identifier: row.identifier,
            description: row.description,
        })
        .collect();

    Ok(Json(ProjectCollection {
        count: projects.len(),
        projects,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCollection {
    count: usize,
    projects: Vec<ProjectResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    id: Id,
    name: String,
    identifier: String,
    description: Option<String>,
}
