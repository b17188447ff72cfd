//! Ticket status repository
//!
//! Database operations for the ordered per-project status columns.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tb_core::traits::Id;
use tb_models::TicketStatus;

use crate::repository::RepositoryResult;

/// Ticket status database entity
#[derive(Debug, Clone, FromRow)]
pub struct TicketStatusRow {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketStatusRow {
    pub fn into_model(self) -> TicketStatus {
        TicketStatus {
            id: Some(self.id),
            project_id: self.project_id,
            name: self.name,
            color: self.color,
            sort_order: self.sort_order,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Ticket status repository implementation
pub struct TicketStatusRepository {
    pool: PgPool,
}

impl TicketStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<TicketStatusRow>> {
        let row = sqlx::query_as::<_, TicketStatusRow>(
            r#"
            SELECT id, project_id, name, color, sort_order, created_at, updated_at
            FROM ticket_statuses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// A project's statuses in board order (rank ascending, ties by id)
    pub async fn find_for_project(&self, project_id: Id) -> RepositoryResult<Vec<TicketStatusRow>> {
        let rows = sqlx::query_as::<_, TicketStatusRow>(
            r#"
            SELECT id, project_id, name, color, sort_order, created_at, updated_at
            FROM ticket_statuses
            WHERE project_id = $1
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
