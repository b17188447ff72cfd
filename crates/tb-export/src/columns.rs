//! Export columns
//!
//! The exportable column set is closed; a request selects a subset and the
//! writer renders header + cells from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tb_core::traits::Id;

/// A column of the ticket spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumn {
    Id,
    Name,
    Status,
    Priority,
    Owner,
    Assignees,
    DueDate,
    StartDate,
    CreatedAt,
}

impl ExportColumn {
    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            ExportColumn::Id => "ID",
            ExportColumn::Name => "Name",
            ExportColumn::Status => "Status",
            ExportColumn::Priority => "Priority",
            ExportColumn::Owner => "Owner",
            ExportColumn::Assignees => "Assignees",
            ExportColumn::DueDate => "Due Date",
            ExportColumn::StartDate => "Start Date",
            ExportColumn::CreatedAt => "Created At",
        }
    }

    /// All columns, in spreadsheet order
    pub fn all() -> &'static [ExportColumn] {
        &[
            ExportColumn::Id,
            ExportColumn::Name,
            ExportColumn::Status,
            ExportColumn::Priority,
            ExportColumn::Owner,
            ExportColumn::Assignees,
            ExportColumn::DueDate,
            ExportColumn::StartDate,
            ExportColumn::CreatedAt,
        ]
    }
}

/// A ticket flattened for export: names resolved, relations joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTicket {
    pub id: Id,
    pub name: String,
    pub status_name: String,
    pub priority_name: Option<String>,
    pub owner_name: String,
    pub assignee_names: Vec<String>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ExportTicket {
    /// Cell value for one column
    pub fn value(&self, column: ExportColumn) -> String {
        match column {
            ExportColumn::Id => self.id.to_string(),
            ExportColumn::Name => self.name.clone(),
            ExportColumn::Status => self.status_name.clone(),
            ExportColumn::Priority => self.priority_name.clone().unwrap_or_default(),
            ExportColumn::Owner => self.owner_name.clone(),
            ExportColumn::Assignees => self.assignee_names.join(", "),
            ExportColumn::DueDate => self
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            ExportColumn::StartDate => self
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            ExportColumn::CreatedAt => self
                .created_at
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportTicket {
        ExportTicket {
            id: 7,
            name: "Fix login".into(),
            status_name: "In Progress".into(),
            priority_name: None,
            owner_name: "Jane Doe".into(),
            assignee_names: vec!["Ada".into(), "Linus".into()],
            due_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            start_date: None,
            created_at: None,
        }
    }

    #[test]
    fn test_values() {
        let ticket = sample();
        assert_eq!(ticket.value(ExportColumn::Id), "7");
        assert_eq!(ticket.value(ExportColumn::Priority), "");
        assert_eq!(ticket.value(ExportColumn::Assignees), "Ada, Linus");
        assert_eq!(ticket.value(ExportColumn::DueDate), "2024-01-10");
        assert_eq!(ticket.value(ExportColumn::StartDate), "");
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&ExportColumn::DueDate).unwrap();
        assert_eq!(json, "\"due_date\"");
    }
}
