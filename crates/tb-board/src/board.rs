//! Board assembly
//!
//! Groups a project's tickets under its rank-ordered statuses and applies the
//! per-column sort preference. Pure over already-loaded rows; repositories do
//! the fetching.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tb_core::traits::Id;
use tb_models::{Ticket, TicketStatus};

use crate::sort::TicketSort;

/// Per-status sort preferences, keyed by status id.
///
/// Statuses without an entry use the default strategy.
#[derive(Debug, Clone, Default)]
pub struct SortPreferences {
    by_status: HashMap<Id, TicketSort>,
}

impl SortPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, status_id: Id, sort: TicketSort) {
        self.by_status.insert(status_id, sort);
    }

    pub fn get(&self, status_id: Id) -> TicketSort {
        self.by_status.get(&status_id).copied().unwrap_or_default()
    }
}

/// One board column: a status and its sorted tickets
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: TicketStatus,
    pub sort: TicketSort,
    pub tickets: Vec<Ticket>,
}

/// The assembled kanban board for one project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub project_id: Id,
    pub columns: Vec<BoardColumn>,
}

impl Board {
    /// Assemble a board from a project's statuses and tickets.
    ///
    /// Statuses are ordered by rank (ties broken by id, keeping the order
    /// total); each column's tickets start in id-ascending order and are then
    /// re-sorted by the column's preference. Tickets referencing a status
    /// that is not part of the project are dropped with a warning.
    pub fn assemble(
        project_id: Id,
        mut statuses: Vec<TicketStatus>,
        tickets: Vec<Ticket>,
        preferences: &SortPreferences,
    ) -> Self {
        statuses.sort_by_key(|s| (s.sort_order, s.id));

        let mut by_status: HashMap<Id, Vec<Ticket>> = HashMap::new();
        let known: HashSet<Id> = statuses.iter().filter_map(|s| s.id).collect();

        for ticket in tickets {
            if known.contains(&ticket.ticket_status_id) {
                by_status
                    .entry(ticket.ticket_status_id)
                    .or_default()
                    .push(ticket);
            } else {
                tracing::warn!(
                    ticket_id = ?ticket.id,
                    status_id = ticket.ticket_status_id,
                    "Dropping ticket with status outside the project"
                );
            }
        }

        let columns = statuses
            .into_iter()
            .map(|status| {
                let status_id = status.id.unwrap_or_default();
                let mut tickets = by_status.remove(&status_id).unwrap_or_default();
                tickets.sort_by_key(|t| t.id);

                let sort = preferences.get(status_id);
                sort.apply(&mut tickets);

                BoardColumn {
                    status,
                    sort,
                    tickets,
                }
            })
            .collect();

        Self {
            project_id,
            columns,
        }
    }

    /// Total number of tickets on the board
    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(|c| c.tickets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn status(id: Id, rank: i32, name: &str) -> TicketStatus {
        let mut s = TicketStatus::new(1, name);
        s.id = Some(id);
        s.sort_order = rank;
        s
    }

    fn ticket(id: Id, status_id: Id, name: &str) -> Ticket {
        let mut t = Ticket::new(name, 1, status_id, 1);
        t.id = Some(id);
        t.created_at = Some(Utc.with_ymd_and_hms(2024, 1, id as u32, 9, 0, 0).unwrap());
        t
    }

    #[test]
    fn test_columns_follow_rank_order() {
        let statuses = vec![
            status(30, 3, "Done"),
            status(10, 1, "Backlog"),
            status(20, 2, "In Progress"),
        ];
        let board = Board::assemble(1, statuses, vec![], &SortPreferences::new());

        let names: Vec<&str> = board
            .columns
            .iter()
            .map(|c| c.status.name.as_str())
            .collect();
        assert_eq!(names, vec!["Backlog", "In Progress", "Done"]);
    }

    #[test]
    fn test_tickets_grouped_and_default_sorted() {
        let statuses = vec![status(10, 1, "Backlog"), status(20, 2, "Done")];
        let tickets = vec![
            ticket(1, 10, "first"),
            ticket(2, 20, "done"),
            ticket(3, 10, "third"),
        ];

        let board = Board::assemble(1, statuses, tickets, &SortPreferences::new());
        assert_eq!(board.ticket_count(), 3);

        // Default is newest-created first.
        let backlog: Vec<&str> = board.columns[0]
            .tickets
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(backlog, vec!["third", "first"]);
    }

    #[test]
    fn test_per_column_preference() {
        let statuses = vec![status(10, 1, "Backlog"), status(20, 2, "Done")];
        let tickets = vec![
            ticket(1, 10, "banana"),
            ticket(2, 10, "apple"),
            ticket(3, 20, "zebra"),
            ticket(4, 20, "aardvark"),
        ];

        let mut prefs = SortPreferences::new();
        prefs.set(10, TicketSort::NameAlphabetical);

        let board = Board::assemble(1, statuses, tickets, &prefs);

        let backlog: Vec<&str> = board.columns[0]
            .tickets
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(backlog, vec!["apple", "banana"]);

        // Unconfigured column keeps the default (newest first).
        let done: Vec<&str> = board.columns[1]
            .tickets
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(done, vec!["aardvark", "zebra"]);
    }

    #[test]
    fn test_ticket_with_foreign_status_is_dropped() {
        let statuses = vec![status(10, 1, "Backlog")];
        let tickets = vec![ticket(1, 10, "kept"), ticket(2, 999, "dropped")];

        let board = Board::assemble(1, statuses, tickets, &SortPreferences::new());
        assert_eq!(board.ticket_count(), 1);
        assert_eq!(board.columns[0].tickets[0].name, "kept");
    }

    #[test]
    fn test_empty_board() {
        let board = Board::assemble(1, vec![], vec![], &SortPreferences::new());
        assert!(board.columns.is_empty());
        assert_eq!(board.ticket_count(), 0);
    }
}
