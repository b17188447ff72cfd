//! Derived Gantt task record

use chrono::NaiveDate;
use serde::Serialize;
use tb_core::traits::Id;

/// Color used for overdue tasks
pub const ALERT_COLOR: &str = "#ef4444";

/// Fallback color when a status carries none
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// A date-ranged visual record computed from one ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTask {
    pub ticket_id: Id,
    /// Display label, truncated
    pub text: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Whole days between start and end, at least 1
    pub duration_days: i64,
    /// Percent complete, 0-100
    pub progress: u8,
    pub status_name: String,
    /// Render color: the status color, or the alert color when overdue
    pub color: String,
    pub is_overdue: bool,
}
