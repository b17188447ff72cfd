//! Ticket export API handler

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tb_core::error::BoardError;
use tb_core::traits::Id;
use tb_db::TicketRepository;
use tb_export::ExportColumn;
use tb_notifications::Feedback;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};
use crate::handlers::visible_project;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub columns: Vec<ExportColumn>,
}

/// Export a project's tickets to a spreadsheet file
///
/// POST /api/v1/projects/:id/export
pub async fn export_tickets(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<impl IntoResponse> {
    if !user.is_super_admin {
        return Err(ApiError::forbidden(
            "Only administrators can export tickets.",
        ));
    }

    let project = visible_project(&state, &user, project_id).await?;
    let pool = state.pool()?;

    let tickets = TicketRepository::new(pool.clone())
        .find_for_export(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    let file = match state
        .export
        .export(&project.name, &request.columns, &tickets)
        .await
    {
        Ok(file) => file,
        Err(err @ BoardError::Validation(_)) => {
            state
                .feedback
                .deliver(
                    user.id,
                    &Feedback::danger("Export Failed").with_body(err.to_string()),
                )
                .await;
            return Err(err.into());
        }
        Err(err) => {
            // Fire-and-forget: one attempt, no retry, a warning to the user.
            tracing::error!(error = %err, project_id, "Export failed");
            state
                .feedback
                .deliver(
                    user.id,
                    &Feedback::danger("Export Failed")
                        .with_body("An error occurred while exporting."),
                )
                .await;
            return Err(err.into());
        }
    };

    state
        .feedback
        .deliver(
            user.id,
            &Feedback::success("Export Successful").with_body("Your file is ready for download."),
        )
        .await;

    Ok(Json(file))
}
