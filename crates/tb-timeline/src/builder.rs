//! Timeline derivation
//!
//! Rules, per ticket with a due date:
//! - start = start_date, falling back to due_date minus 7 days
//! - end = due_date, pushed to start + 1 day whenever end <= start
//! - progress = 1-indexed position of the ticket's status among the
//!   project's rank-ordered statuses, over the total, as a rounded percent
//! - overdue when the end date has passed and progress is below 100
//!
//! A ticket that cannot be derived is skipped; the timeline degrades to
//! partial data instead of failing.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tb_core::traits::Id;
use tb_models::{Ticket, TicketStatus};

use crate::task::{TimelineTask, ALERT_COLOR, DEFAULT_COLOR};

const FALLBACK_START_DAYS: i64 = 7;
const LABEL_MAX_CHARS: usize = 50;

/// The derived timeline for one project
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub tasks: Vec<TimelineTask>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Derive the timeline from a project's statuses and tickets.
///
/// `today` is injected so derivation stays pure; handlers pass the current
/// date. Tickets without a due date are excluded; output is ordered by due
/// date ascending (ties by id).
pub fn build_timeline(
    statuses: &[TicketStatus],
    tickets: &[Ticket],
    today: NaiveDate,
) -> Timeline {
    let mut ordered: Vec<&TicketStatus> = statuses.iter().collect();
    ordered.sort_by_key(|s| (s.sort_order, s.id));

    let mut dated: Vec<&Ticket> = tickets.iter().filter(|t| t.due_date.is_some()).collect();
    dated.sort_by_key(|t| (t.due_date, t.id));

    let mut tasks = Vec::with_capacity(dated.len());
    for ticket in dated {
        match derive_task(&ordered, ticket, today) {
            Some(task) => tasks.push(task),
            None => {
                tracing::warn!(ticket_id = ?ticket.id, "Skipping ticket in timeline derivation");
            }
        }
    }

    Timeline { tasks }
}

fn derive_task(
    ordered_statuses: &[&TicketStatus],
    ticket: &Ticket,
    today: NaiveDate,
) -> Option<TimelineTask> {
    let ticket_id = ticket.id?;
    let due_date = ticket.due_date?;

    let start_date = ticket
        .start_date
        .unwrap_or(due_date - Duration::days(FALLBACK_START_DAYS));

    let mut end_date = due_date;
    if end_date <= start_date {
        end_date = start_date + Duration::days(1);
    }

    let duration_days = (end_date - start_date).num_days().max(1);

    let status = ordered_statuses
        .iter()
        .find(|s| s.id == Some(ticket.ticket_status_id));
    let progress = status_progress(ordered_statuses, ticket.ticket_status_id);

    let is_overdue = end_date < today && progress < 100;
    let status_color = status
        .and_then(|s| s.color.clone())
        .unwrap_or_else(|| DEFAULT_COLOR.to_string());

    Some(TimelineTask {
        ticket_id,
        text: truncate_label(&ticket.name),
        start_date,
        end_date,
        duration_days,
        progress,
        status_name: status.map(|s| s.name.clone()).unwrap_or_else(|| "Unknown".into()),
        color: if is_overdue {
            ALERT_COLOR.to_string()
        } else {
            status_color
        },
        is_overdue,
    })
}

/// Percent complete from the 1-indexed status position over the total,
/// rounded to the nearest integer and clamped to 0..=100. Unknown status or
/// an empty status list yield 0.
fn status_progress(ordered_statuses: &[&TicketStatus], status_id: Id) -> u8 {
    if ordered_statuses.is_empty() {
        return 0;
    }

    let position = match ordered_statuses
        .iter()
        .position(|s| s.id == Some(status_id))
    {
        Some(index) => index + 1,
        None => return 0,
    };

    let percent = (position as f64 / ordered_statuses.len() as f64) * 100.0;
    percent.round().clamp(0.0, 100.0) as u8
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let truncated: String = name.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> Vec<TicketStatus> {
        let mut todo = TicketStatus::new(1, "To Do");
        todo.id = Some(10);
        todo.sort_order = 1;
        todo.color = Some("#a1a1aa".into());

        let mut doing = TicketStatus::new(1, "Doing");
        doing.id = Some(20);
        doing.sort_order = 2;
        doing.color = Some("#f59e0b".into());

        let mut done = TicketStatus::new(1, "Done");
        done.id = Some(30);
        done.sort_order = 3;
        done.color = Some("#22c55e".into());

        vec![todo, doing, done]
    }

    fn ticket(id: Id, status_id: Id, due: Option<NaiveDate>) -> Ticket {
        let mut t = Ticket::new(format!("Ticket {}", id), 1, status_id, 1);
        t.id = Some(id);
        t.due_date = due;
        t
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_falls_back_seven_days_before_due() {
        let tickets = vec![ticket(1, 10, Some(date(2024, 1, 10)))];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 1, 1));

        let task = &timeline.tasks[0];
        assert_eq!(task.start_date, date(2024, 1, 3));
        assert_eq!(task.end_date, date(2024, 1, 10));
        assert_eq!(task.duration_days, 7);
    }

    #[test]
    fn test_explicit_start_kept_and_end_pushed_past_start() {
        let mut t = ticket(1, 10, Some(date(2024, 1, 10)));
        t.start_date = Some(date(2024, 1, 9));
        let timeline = build_timeline(&statuses(), &[t], date(2024, 1, 1));

        let task = &timeline.tasks[0];
        assert_eq!(task.start_date, date(2024, 1, 9));
        assert_eq!(task.end_date, date(2024, 1, 10));

        // Start on/after due: end is forced one day past start.
        let mut t = ticket(2, 10, Some(date(2024, 1, 10)));
        t.start_date = Some(date(2024, 1, 10));
        let timeline = build_timeline(&statuses(), &[t], date(2024, 1, 1));

        let task = &timeline.tasks[0];
        assert_eq!(task.start_date, date(2024, 1, 10));
        assert_eq!(task.end_date, date(2024, 1, 11));
        assert_eq!(task.duration_days, 1);
    }

    #[test]
    fn test_progress_from_status_position() {
        let tickets = vec![
            ticket(1, 10, Some(date(2024, 1, 10))),
            ticket(2, 20, Some(date(2024, 1, 11))),
            ticket(3, 30, Some(date(2024, 1, 12))),
        ];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 1, 1));

        let progress: Vec<u8> = timeline.tasks.iter().map(|t| t.progress).collect();
        assert_eq!(progress, vec![33, 67, 100]);
    }

    #[test]
    fn test_unknown_status_means_zero_progress() {
        let tickets = vec![ticket(1, 999, Some(date(2024, 1, 10)))];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 1, 1));

        let task = &timeline.tasks[0];
        assert_eq!(task.progress, 0);
        assert_eq!(task.status_name, "Unknown");
        assert_eq!(task.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_overdue_uses_alert_color() {
        // Past due, not in the final status.
        let tickets = vec![ticket(1, 20, Some(date(2024, 1, 10)))];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 2, 1));

        let task = &timeline.tasks[0];
        assert!(task.is_overdue);
        assert_eq!(task.color, ALERT_COLOR);
    }

    #[test]
    fn test_completed_task_is_never_overdue() {
        // Past due but in the final status (progress 100).
        let tickets = vec![ticket(1, 30, Some(date(2024, 1, 10)))];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 2, 1));

        let task = &timeline.tasks[0];
        assert!(!task.is_overdue);
        assert_eq!(task.color, "#22c55e");
    }

    #[test]
    fn test_tickets_without_due_date_are_excluded() {
        let tickets = vec![
            ticket(1, 10, None),
            ticket(2, 10, Some(date(2024, 1, 10))),
        ];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 1, 1));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.tasks[0].ticket_id, 2);
    }

    #[test]
    fn test_output_ordered_by_due_date() {
        let tickets = vec![
            ticket(1, 10, Some(date(2024, 3, 1))),
            ticket(2, 10, Some(date(2024, 1, 1))),
            ticket(3, 10, Some(date(2024, 2, 1))),
        ];
        let timeline = build_timeline(&statuses(), &tickets, date(2024, 1, 1));

        let ids: Vec<Id> = timeline.tasks.iter().map(|t| t.ticket_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_long_names_truncated() {
        let mut t = ticket(1, 10, Some(date(2024, 1, 10)));
        t.name = "x".repeat(60);
        let timeline = build_timeline(&statuses(), &[t], date(2024, 1, 1));

        let text = &timeline.tasks[0].text;
        assert_eq!(text.chars().count(), 53);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_no_statuses_degrades_to_zero_progress() {
        let tickets = vec![ticket(1, 10, Some(date(2024, 1, 10)))];
        let timeline = build_timeline(&[], &tickets, date(2024, 1, 1));
        assert_eq!(timeline.tasks[0].progress, 0);
    }
}
