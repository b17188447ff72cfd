//! Ticket repository
//!
//! Database operations for tickets, their assignee join table, and the
//! flattened export rows.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tb_core::traits::Id;
use tb_export::ExportTicket;
use tb_models::Ticket;

use crate::repository::{RepositoryError, RepositoryResult};

/// Ticket database entity
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub project_id: i64,
    pub ticket_status_id: i64,
    pub user_id: i64,
    pub priority_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketRow {
    pub fn into_model(self, assignee_ids: Vec<Id>) -> Ticket {
        Ticket {
            id: Some(self.id),
            name: self.name,
            description: self.description,
            project_id: self.project_id,
            ticket_status_id: self.ticket_status_id,
            user_id: self.user_id,
            priority_id: self.priority_id,
            start_date: self.start_date,
            due_date: self.due_date,
            assignee_ids,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Flattened export row as returned by the export query
#[derive(Debug, Clone, FromRow)]
struct ExportRow {
    id: i64,
    name: String,
    status_name: String,
    priority_name: Option<String>,
    owner_name: String,
    due_date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

/// Ticket repository implementation
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, name, description, project_id, ticket_status_id, user_id,
                   priority_id, start_date, due_date, created_at, updated_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut assignees = self.assignees_for(&[row.id]).await?;
                let assignee_ids = assignees.remove(&row.id).unwrap_or_default();
                Ok(Some(row.into_model(assignee_ids)))
            }
            None => Ok(None),
        }
    }

    /// All of a project's tickets in id order, assignees attached — the
    /// board's working set.
    pub async fn find_for_board(&self, project_id: Id) -> RepositoryResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, name, description, project_id, ticket_status_id, user_id,
                   priority_id, start_date, due_date, created_at, updated_at
            FROM tickets
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_assignees(rows).await
    }

    /// Tickets with a due date, for the timeline, due date ascending
    pub async fn find_with_due_dates(&self, project_id: Id) -> RepositoryResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, name, description, project_id, ticket_status_id, user_id,
                   priority_id, start_date, due_date, created_at, updated_at
            FROM tickets
            WHERE project_id = $1 AND due_date IS NOT NULL
            ORDER BY due_date ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_assignees(rows).await
    }

    /// Persist a status transition. Last write wins; there is no conflict
    /// detection on concurrent moves.
    pub async fn update_status(&self, ticket_id: Id, status_id: Id) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE tickets SET ticket_status_id = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(status_id)
        .bind(ticket_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Ticket with id {} not found",
                ticket_id
            )));
        }

        Ok(())
    }

    /// Flattened rows for the spreadsheet export, newest created first.
    pub async fn find_for_export(&self, project_id: Id) -> RepositoryResult<Vec<ExportTicket>> {
        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT t.id, t.name,
                   s.name AS status_name,
                   p.name AS priority_name,
                   u.name AS owner_name,
                   t.due_date, t.start_date, t.created_at
            FROM tickets t
            INNER JOIN ticket_statuses s ON s.id = t.ticket_status_id
            INNER JOIN users u ON u.id = t.user_id
            LEFT JOIN priorities p ON p.id = t.priority_id
            WHERE t.project_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Id> = rows.iter().map(|r| r.id).collect();
        let mut names = self.assignee_names_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| ExportTicket {
                id: row.id,
                name: row.name,
                status_name: row.status_name,
                priority_name: row.priority_name,
                owner_name: row.owner_name,
                assignee_names: names.remove(&row.id).unwrap_or_default(),
                due_date: row.due_date,
                start_date: row.start_date,
                created_at: Some(row.created_at),
            })
            .collect())
    }

    async fn attach_assignees(&self, rows: Vec<TicketRow>) -> RepositoryResult<Vec<Ticket>> {
        let ids: Vec<Id> = rows.iter().map(|r| r.id).collect();
        let mut assignees = self.assignees_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let assignee_ids = assignees.remove(&row.id).unwrap_or_default();
                row.into_model(assignee_ids)
            })
            .collect())
    }

    /// Assignee user ids per ticket
    async fn assignees_for(&self, ticket_ids: &[Id]) -> RepositoryResult<HashMap<Id, Vec<Id>>> {
        if ticket_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let pairs = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT ticket_id, user_id
            FROM ticket_assignees
            WHERE ticket_id = ANY($1)
            ORDER BY ticket_id, user_id
            "#,
        )
        .bind(ticket_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Id, Vec<Id>> = HashMap::new();
        for (ticket_id, user_id) in pairs {
            grouped.entry(ticket_id).or_default().push(user_id);
        }

        Ok(grouped)
    }

    /// Assignee display names per ticket (export)
    async fn assignee_names_for(
        &self,
        ticket_ids: &[Id],
    ) -> RepositoryResult<HashMap<Id, Vec<String>>> {
        if ticket_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let pairs = sqlx::query_as::<_, (i64, String)>(
            r#"
            SELECT ta.ticket_id, u.name
            FROM ticket_assignees ta
            INNER JOIN users u ON u.id = ta.user_id
            WHERE ta.ticket_id = ANY($1)
            ORDER BY ta.ticket_id, u.name
            "#,
        )
        .bind(ticket_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Id, Vec<String>> = HashMap::new();
        for (ticket_id, name) in pairs {
            grouped.entry(ticket_id).or_default().push(name);
        }

        Ok(grouped)
    }
}
