//! Pg-backed notification store
//!
//! Implements the inbox storage trait over PostgreSQL. The monotonic read
//! state is enforced in SQL: the mark-read update only touches rows whose
//! `read_at` is still NULL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tb_core::pagination::Pagination;
use tb_core::traits::Id;
use tb_notifications::inbox::{InboxError, InboxResult, NotificationStore};
use tb_notifications::Notification;

/// Notification database entity
#[derive(Debug, Clone, FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    ticket_id: Option<i64>,
    message: String,
    data: serde_json::Value,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_model(self) -> Notification {
        Notification {
            id: Some(self.id),
            user_id: self.user_id,
            ticket_id: self.ticket_id,
            message: self.message,
            data: self.data,
            read_at: self.read_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn storage_err(e: sqlx::Error) -> InboxError {
    InboxError::Storage(e.to_string())
}

/// PostgreSQL notification store
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, notification: &mut Notification) -> InboxResult<Id> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO notifications (user_id, ticket_id, message, data, read_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.ticket_id)
        .bind(&notification.message)
        .bind(&notification.data)
        .bind(notification.read_at)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        notification.id = Some(id);
        Ok(id)
    }

    async fn get(&self, id: Id) -> InboxResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, ticket_id, message, data, read_at, created_at, updated_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(row.map(NotificationRow::into_model))
    }

    async fn list_for_user(
        &self,
        user_id: Id,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, ticket_id, message, data, read_at, created_at, updated_at
            FROM notifications
            WHERE user_id = $1 AND ($2 = false OR read_at IS NULL)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(NotificationRow::into_model).collect())
    }

    async fn list_all(
        &self,
        unread_only: bool,
        pagination: Pagination,
    ) -> InboxResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, ticket_id, message, data, read_at, created_at, updated_at
            FROM notifications
            WHERE ($1 = false OR read_at IS NULL)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(unread_only)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(NotificationRow::into_model).collect())
    }

    async fn mark_read(&self, id: Id) -> InboxResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW(), updated_at = NOW() WHERE id = $1 AND read_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Nothing changed: either already read (a no-op) or missing.
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM notifications WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        if exists {
            Ok(false)
        } else {
            Err(InboxError::NotFound(id))
        }
    }

    async fn mark_all_read(&self, user_id: Id) -> InboxResult<usize> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW(), updated_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(result.rows_affected() as usize)
    }

    async fn unread_count(&self, user_id: Id) -> InboxResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(count as usize)
    }
}
