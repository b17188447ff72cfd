//! API routes

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Serialize;

use crate::extractors::AppState;
use crate::handlers::{board, export, notifications, priorities, projects, timeline, users};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .route("/users/me", get(users::current_user))
        .route("/priorities", get(priorities::list_priorities))
        .nest("/projects", projects_router())
        .nest("/notifications", notifications_router())
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/:id/board", get(board::get_board))
        .route("/:id/board/sort", put(board::set_sort_order))
        .route("/:id/board/move", post(board::move_ticket))
        .route("/:id/timeline", get(timeline::get_timeline))
        .route("/:id/export", post(export::export_tickets))
}

fn notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread_count", get(notifications::unread_count))
        .route("/:id/read", post(notifications::mark_read))
        .route("/read_all", post(notifications::mark_all_read))
}

async fn api_root() -> axum::Json<ApiRoot> {
    axum::Json(ApiRoot {
        instance_name: "TicketBoard RS".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoot {
    instance_name: String,
    version: String,
}
