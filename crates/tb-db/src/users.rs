//! User repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tb_core::traits::Id;
use tb_models::User;

use crate::repository::RepositoryResult;

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_model(self) -> User {
        User {
            id: Some(self.id),
            login: self.login,
            name: self.name,
            email: self.email,
            is_super_admin: self.is_super_admin,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// User repository implementation
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, name, email, is_super_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_login(&self, login: &str) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, name, email, is_super_admin, created_at, updated_at
            FROM users
            WHERE LOWER(login) = LOWER($1)
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
