//! Per-column ticket sort strategies
//!
//! A closed enum dispatched through a comparator lookup; the ad-hoc sort
//! strings a client sends are parsed once at the boundary and unknown values
//! fall back to the default.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tb_models::Ticket;

/// Weight used for tickets without a priority so they sort last.
const MISSING_PRIORITY_WEIGHT: i64 = 999;

/// Sort strategy for one board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TicketSort {
    /// Newest created first (default)
    #[default]
    #[serde(rename = "date_created_newest")]
    CreatedNewest,
    /// Oldest created first
    #[serde(rename = "date_created_oldest")]
    CreatedOldest,
    /// Ticket name, A-Z
    #[serde(rename = "card_name_alphabetical")]
    NameAlphabetical,
    /// Due date ascending; tickets without a due date last
    #[serde(rename = "due_date")]
    DueDate,
    /// Priority ascending; tickets without a priority last
    #[serde(rename = "priority")]
    Priority,
}

impl TicketSort {
    /// Parse a wire name; `None` for anything outside the closed set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date_created_newest" => Some(Self::CreatedNewest),
            "date_created_oldest" => Some(Self::CreatedOldest),
            "card_name_alphabetical" => Some(Self::NameAlphabetical),
            "due_date" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    /// Parse a wire name, falling back to the default strategy.
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatedNewest => "date_created_newest",
            Self::CreatedOldest => "date_created_oldest",
            Self::NameAlphabetical => "card_name_alphabetical",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
        }
    }

    /// All strategies, for option lists.
    pub fn all() -> &'static [TicketSort] {
        &[
            Self::CreatedNewest,
            Self::CreatedOldest,
            Self::NameAlphabetical,
            Self::DueDate,
            Self::Priority,
        ]
    }

    /// The comparator this strategy dispatches to.
    pub fn comparator(&self) -> fn(&Ticket, &Ticket) -> Ordering {
        match self {
            Self::CreatedNewest => cmp_created_newest,
            Self::CreatedOldest => cmp_created_oldest,
            Self::NameAlphabetical => cmp_name,
            Self::DueDate => cmp_due_date,
            Self::Priority => cmp_priority,
        }
    }

    /// Sort a column's tickets in place. The underlying sort is stable, so
    /// tickets comparing equal keep their incoming (id ascending) order.
    pub fn apply(&self, tickets: &mut [Ticket]) {
        tickets.sort_by(self.comparator());
    }
}

fn cmp_created_newest(a: &Ticket, b: &Ticket) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

fn cmp_created_oldest(a: &Ticket, b: &Ticket) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn cmp_name(a: &Ticket, b: &Ticket) -> Ordering {
    a.name.cmp(&b.name)
}

fn due_date_key(ticket: &Ticket) -> NaiveDate {
    ticket.due_date.unwrap_or(NaiveDate::MAX)
}

fn cmp_due_date(a: &Ticket, b: &Ticket) -> Ordering {
    due_date_key(a).cmp(&due_date_key(b))
}

fn priority_key(ticket: &Ticket) -> i64 {
    ticket.priority_id.unwrap_or(MISSING_PRIORITY_WEIGHT)
}

fn cmp_priority(a: &Ticket, b: &Ticket) -> Ordering {
    priority_key(a).cmp(&priority_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ticket(id: i64, name: &str) -> Ticket {
        let mut t = Ticket::new(name, 1, 10, 1);
        t.id = Some(id);
        t.created_at = Some(Utc.with_ymd_and_hms(2024, 1, id as u32, 12, 0, 0).unwrap());
        t
    }

    fn names(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(TicketSort::from_name("due_date"), Some(TicketSort::DueDate));
        assert_eq!(TicketSort::from_name("bogus"), None);
        assert_eq!(
            TicketSort::parse_or_default("bogus"),
            TicketSort::CreatedNewest
        );
    }

    #[test]
    fn test_created_newest_is_default() {
        let mut tickets = vec![ticket(1, "old"), ticket(3, "new"), ticket(2, "mid")];
        TicketSort::default().apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_created_oldest() {
        let mut tickets = vec![ticket(3, "new"), ticket(1, "old"), ticket(2, "mid")];
        TicketSort::CreatedOldest.apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_name_alphabetical() {
        let mut tickets = vec![ticket(1, "cherry"), ticket(2, "apple"), ticket(3, "banana")];
        TicketSort::NameAlphabetical.apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_due_date_missing_sorts_last() {
        let mut a = ticket(1, "no-due");
        a.due_date = None;
        let mut b = ticket(2, "later");
        b.due_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let mut c = ticket(3, "sooner");
        c.due_date = NaiveDate::from_ymd_opt(2024, 2, 1);

        let mut tickets = vec![a, b, c];
        TicketSort::DueDate.apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["sooner", "later", "no-due"]);
    }

    #[test]
    fn test_priority_missing_weighs_999() {
        let mut a = ticket(1, "none");
        a.priority_id = None;
        let mut b = ticket(2, "high");
        b.priority_id = Some(1);
        let mut c = ticket(3, "low");
        c.priority_id = Some(3);

        let mut tickets = vec![a, b, c];
        TicketSort::Priority.apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["high", "low", "none"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        // Same due date: incoming order (by id) must be preserved.
        let mut tickets: Vec<Ticket> = (1..=4)
            .map(|id| {
                let mut t = ticket(id, &format!("t{}", id));
                t.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);
                t
            })
            .collect();

        TicketSort::DueDate.apply(&mut tickets);
        assert_eq!(names(&tickets), vec!["t1", "t2", "t3", "t4"]);
    }
}
