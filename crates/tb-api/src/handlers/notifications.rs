//! Notification inbox API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tb_core::traits::Id;
use tb_db::PgNotificationStore;
use tb_notifications::{Feedback, InboxService, Notification};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Pagination};

fn inbox(pool: &PgPool) -> InboxService<PgNotificationStore> {
    InboxService::new(PgNotificationStore::new(pool.clone()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// List the caller's inbox (all inboxes for super admins)
///
/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<InboxQuery>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;

    let notifications = inbox(pool)
        .list(&user.0, query.unread_only, *pagination)
        .await?;

    Ok(Json(NotificationCollection {
        count: notifications.len(),
        notifications,
    }))
}

/// Unread count for the caller (navigation badge)
///
/// GET /api/v1/notifications/unread_count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let count = inbox(pool).unread_count(&user.0).await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one notification read (idempotent)
///
/// POST /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    inbox(pool).mark_read(&user.0, id).await?;

    state
        .feedback
        .deliver(user.id, &Feedback::success("Notification marked as read"))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Mark all of the caller's own notifications read
///
/// POST /api/v1/notifications/read_all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let pool = state.pool()?;
    let marked = inbox(pool).mark_all_read(&user.0).await?;

    state
        .feedback
        .deliver(user.id, &Feedback::success("All notifications marked as read"))
        .await;

    Ok(Json(MarkAllResponse { marked }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationCollection {
    count: usize,
    notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnreadCountResponse {
    count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkAllResponse {
    marked: usize,
}
