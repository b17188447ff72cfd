//! API handlers

pub mod board;
pub mod export;
pub mod notifications;
pub mod priorities;
pub mod projects;
pub mod timeline;
pub mod users;

use tb_core::traits::Id;

use crate::error::ApiError;
use crate::extractors::AppState;
use tb_auth::CurrentUser;
use tb_db::{ProjectRepository, ProjectRow};

/// Resolve a project the acting user may see.
///
/// Super admins see every project; other users only the projects they are
/// members of. Anything else reads as "Project Not Found" rather than
/// leaking existence.
pub(crate) async fn visible_project(
    state: &AppState,
    user: &CurrentUser,
    project_id: Id,
) -> Result<ProjectRow, ApiError> {
    let pool = state.pool()?;
    let repo = ProjectRepository::new(pool.clone());

    let project = repo
        .find_by_id(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Project", project_id))?;

    if !user.is_member_of(project_id) {
        let member = repo
            .is_member(project_id, user.id)
            .await
            .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;
        if !member {
            return Err(ApiError::not_found("Project", project_id));
        }
    }

    Ok(project)
}
