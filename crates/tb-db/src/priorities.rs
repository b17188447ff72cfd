//! Priority repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tb_core::traits::Id;
use tb_models::Priority;

use crate::repository::RepositoryResult;

/// Priority database entity
#[derive(Debug, Clone, FromRow)]
pub struct PriorityRow {
    pub id: i64,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriorityRow {
    pub fn into_model(self) -> Priority {
        Priority {
            id: Some(self.id),
            name: self.name,
            position: self.position,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Priority repository implementation
pub struct PriorityRepository {
    pool: PgPool,
}

impl PriorityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<PriorityRow>> {
        let row = sqlx::query_as::<_, PriorityRow>(
            r#"
            SELECT id, name, position, created_at, updated_at
            FROM priorities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_all(&self) -> RepositoryResult<Vec<PriorityRow>> {
        let rows = sqlx::query_as::<_, PriorityRow>(
            r#"
            SELECT id, name, position, created_at, updated_at
            FROM priorities
            ORDER BY position ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
