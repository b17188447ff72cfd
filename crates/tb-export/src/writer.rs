//! Spreadsheet rendering and the export operation
//!
//! Renders the selected columns to CSV and writes the file through the
//! storage seam under a unique name. The operation is synchronous
//! fire-and-forget: one attempt, no retry; a failure surfaces as a warning.

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tb_core::error::{BoardError, ValidationErrors};
use tb_core::result::BoardResult;

use crate::columns::{ExportColumn, ExportTicket};
use crate::storage::Storage;

/// A written export file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub filename: String,
    pub url: String,
    pub size_bytes: u64,
    pub row_count: usize,
}

/// Export service writing through a storage backend
pub struct ExportService<S: Storage> {
    storage: S,
}

impl<S: Storage> ExportService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Export tickets to a CSV spreadsheet.
    ///
    /// Rejects an empty column selection and an empty ticket list with a
    /// validation failure before touching storage.
    pub async fn export(
        &self,
        project_name: &str,
        columns: &[ExportColumn],
        tickets: &[ExportTicket],
    ) -> BoardResult<ExportFile> {
        if columns.is_empty() {
            return Err(BoardError::Validation(ValidationErrors::base(
                "Please select at least one column to export.",
            )));
        }

        if tickets.is_empty() {
            return Err(BoardError::Validation(ValidationErrors::base(
                "No tickets found to export.",
            )));
        }

        let filename = unique_filename(project_name);
        let csv = render_csv(columns, tickets);

        let size_bytes = self
            .storage
            .put(&filename, Bytes::from(csv))
            .await
            .map_err(|e| BoardError::Storage(e.to_string()))?;

        tracing::info!(
            filename = %filename,
            rows = tickets.len(),
            storage = self.storage.name(),
            "Exported tickets"
        );

        Ok(ExportFile {
            url: self.storage.url(&filename),
            filename,
            size_bytes,
            row_count: tickets.len(),
        })
    }
}

/// Render header + rows as CSV text.
pub fn render_csv(columns: &[ExportColumn], tickets: &[ExportTicket]) -> String {
    let mut out = String::new();

    let header: Vec<String> = columns.iter().map(|c| csv_field(c.label())).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for ticket in tickets {
        let row: Vec<String> = columns
            .iter()
            .map(|c| csv_field(&ticket.value(*c)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Collision-free filename: slugged project name, timestamp, short unique
/// suffix.
fn unique_filename(project_name: &str) -> String {
    let slug = slugify(project_name);
    let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let unique = uuid::Uuid::new_v4().simple().to_string();
    format!("tickets_{}_{}_{}.csv", slug, stamp, &unique[..8])
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let collapsed = slug
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if collapsed.is_empty() {
        "export".to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use chrono::NaiveDate;

    fn ticket(id: i64, name: &str) -> ExportTicket {
        ExportTicket {
            id,
            name: name.into(),
            status_name: "Backlog".into(),
            priority_name: Some("High".into()),
            owner_name: "Jane Doe".into(),
            assignee_names: vec![],
            due_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            start_date: None,
            created_at: None,
        }
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_csv() {
        let columns = [ExportColumn::Id, ExportColumn::Name, ExportColumn::Status];
        let tickets = [ticket(1, "Fix, the login")];

        let csv = render_csv(&columns, &tickets);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Name,Status"));
        assert_eq!(lines.next(), Some("1,\"Fix, the login\",Backlog"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Website Relaunch!"), "website_relaunch");
        assert_eq!(slugify("  "), "export");
    }

    #[test]
    fn test_unique_filenames_differ() {
        let a = unique_filename("Demo");
        let b = unique_filename("Demo");
        assert_ne!(a, b);
        assert!(a.starts_with("tickets_demo_"));
        assert!(a.ends_with(".csv"));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let service = ExportService::new(LocalStorage::temp().unwrap());
        let columns = [ExportColumn::Id, ExportColumn::Name];
        let tickets = [ticket(1, "One"), ticket(2, "Two")];

        let file = service.export("Demo", &columns, &tickets).await.unwrap();
        assert_eq!(file.row_count, 2);
        assert!(file.size_bytes > 0);
        assert!(file.url.starts_with("/exports/tickets_demo_"));
    }

    #[tokio::test]
    async fn test_empty_columns_rejected() {
        let service = ExportService::new(LocalStorage::temp().unwrap());
        let err = service
            .export("Demo", &[], &[ticket(1, "One")])
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_tickets_rejected() {
        let service = ExportService::new(LocalStorage::temp().unwrap());
        let err = service
            .export("Demo", &[ExportColumn::Id], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
    }
}
