//! Board API handlers
//!
//! Loading the kanban board, choosing per-column sort orders, and moving
//! tickets between statuses.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tb_board::{Board, MoveTicket, SortPreferences, TicketMove, TicketSort};
use tb_core::error::BoardError;
use tb_core::traits::Id;
use tb_db::{TicketRepository, TicketStatusRepository};
use tb_notifications::Feedback;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};
use crate::handlers::visible_project;

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Per-column sort preferences as `<status_id>:<strategy>` pairs,
    /// comma-separated, e.g. `sort=10:due_date,20:priority`.
    pub sort: Option<String>,
}

/// Parse the sort query into preferences. Malformed pairs and unknown
/// strategy names fall back to the default, as a stale client must not break
/// the board.
fn parse_sort_preferences(raw: Option<&str>) -> SortPreferences {
    let mut preferences = SortPreferences::new();
    let Some(raw) = raw else {
        return preferences;
    };

    for pair in raw.split(',').filter(|p| !p.is_empty()) {
        let Some((status_id, strategy)) = pair.split_once(':') else {
            tracing::debug!(pair, "Ignoring malformed sort pair");
            continue;
        };
        let Ok(status_id) = status_id.trim().parse::<Id>() else {
            tracing::debug!(pair, "Ignoring sort pair with bad status id");
            continue;
        };
        preferences.set(status_id, TicketSort::parse_or_default(strategy.trim()));
    }

    preferences
}

async fn load_board(
    state: &AppState,
    project_id: Id,
    preferences: &SortPreferences,
) -> Result<Board, ApiError> {
    let pool = state.pool()?;

    let statuses = TicketStatusRepository::new(pool.clone())
        .find_for_project(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .into_iter()
        .map(|row| row.into_model())
        .collect();

    let tickets = TicketRepository::new(pool.clone())
        .find_for_board(project_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?;

    Ok(Board::assemble(project_id, statuses, tickets, preferences))
}

/// Load a project's board
///
/// GET /api/v1/projects/:id/board
pub async fn get_board(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<impl IntoResponse> {
    visible_project(&state, &user, project_id).await?;

    let preferences = parse_sort_preferences(query.sort.as_deref());
    let board = load_board(&state, project_id, &preferences).await?;

    Ok(Json(board))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSortRequest {
    pub status_id: Id,
    pub sort: String,
}

/// Choose a column's sort order and reload the board
///
/// PUT /api/v1/projects/:id/board/sort
pub async fn set_sort_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    Json(request): Json<SetSortRequest>,
) -> ApiResult<impl IntoResponse> {
    visible_project(&state, &user, project_id).await?;

    let sort = TicketSort::parse_or_default(&request.sort);
    let mut preferences = SortPreferences::new();
    preferences.set(request.status_id, sort);

    let board = load_board(&state, project_id, &preferences).await?;

    Ok(Json(board))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTicketRequest {
    pub ticket_id: Id,
    pub status_id: Id,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTicketResponse {
    pub moved: TicketMove,
    pub board: Board,
}

/// Move a ticket to another status of the same project
///
/// POST /api/v1/projects/:id/board/move
pub async fn move_ticket(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Id>,
    Json(request): Json<MoveTicketRequest>,
) -> ApiResult<impl IntoResponse> {
    visible_project(&state, &user, project_id).await?;
    let pool = state.pool()?;

    let ticket_repo = TicketRepository::new(pool.clone());
    let ticket = ticket_repo
        .find_by_id(request.ticket_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("Ticket", request.ticket_id))?;

    let target_status = TicketStatusRepository::new(pool.clone())
        .find_by_id(request.status_id)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("TicketStatus", request.status_id))?
        .into_model();

    let mover = MoveTicket::new(&user, &state.gate);
    let moved = match mover.call(project_id, &ticket, &target_status) {
        Ok(moved) => moved,
        Err(err @ BoardError::PermissionDenied { .. }) => {
            state
                .feedback
                .deliver(
                    user.id,
                    &Feedback::danger("Permission Denied")
                        .with_body("You do not have permission to move this ticket."),
                )
                .await;
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    ticket_repo
        .update_status(moved.ticket_id, moved.to_status_id)
        .await
        .map_err(|e| match e {
            tb_db::RepositoryError::NotFound(_) => ApiError::not_found("Ticket", moved.ticket_id),
            e => ApiError::internal(format!("Database error: {}", e)),
        })?;

    tracing::info!(
        ticket_id = moved.ticket_id,
        from = moved.from_status_id,
        to = moved.to_status_id,
        user_id = user.id,
        "Moved ticket"
    );

    state
        .feedback
        .deliver(user.id, &Feedback::success("Ticket Updated"))
        .await;

    let board = load_board(&state, project_id, &SortPreferences::new()).await?;

    Ok(Json(MoveTicketResponse { moved, board }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_preferences() {
        let prefs = parse_sort_preferences(Some("10:due_date,20:priority"));
        assert_eq!(prefs.get(10), TicketSort::DueDate);
        assert_eq!(prefs.get(20), TicketSort::Priority);
        // Unset columns use the default.
        assert_eq!(prefs.get(30), TicketSort::CreatedNewest);
    }

    #[test]
    fn test_parse_sort_preferences_tolerates_garbage() {
        let prefs = parse_sort_preferences(Some("nonsense,abc:due_date,10:bogus,"));
        // Unknown strategies fall back to the default.
        assert_eq!(prefs.get(10), TicketSort::CreatedNewest);
    }

    #[test]
    fn test_parse_sort_preferences_empty() {
        let prefs = parse_sort_preferences(None);
        assert_eq!(prefs.get(1), TicketSort::CreatedNewest);
    }
}
