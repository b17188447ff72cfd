//! Move-ticket transition
//!
//! Any status of the ticket's own project is a legal target; there is no
//! workflow graph. What the mover enforces is scoping (the ticket belongs to
//! the selected project, the target status belongs to the same project) and
//! the gate's Manage check. Persistence happens after validation, in the
//! caller — concurrent moves are last-write-wins by design of the store.

use serde::Serialize;
use tb_auth::{CurrentUser, GatePolicy, TicketAction};
use tb_core::error::BoardError;
use tb_core::result::BoardResult;
use tb_core::traits::{Entity, Id};
use tb_models::{Ticket, TicketStatus};

/// A validated status transition, ready to persist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMove {
    pub ticket_id: Id,
    pub from_status_id: Id,
    pub to_status_id: Id,
}

/// Move-ticket validation service
pub struct MoveTicket<'a> {
    user: &'a CurrentUser,
    gate: &'a GatePolicy,
}

impl<'a> MoveTicket<'a> {
    pub fn new(user: &'a CurrentUser, gate: &'a GatePolicy) -> Self {
        Self { user, gate }
    }

    /// Validate a move of `ticket` to `target_status` within
    /// `selected_project_id`.
    ///
    /// Rejections:
    /// - ticket not part of the selected project → `NotFound`
    /// - target status not part of the ticket's project → `NotFound`
    /// - gate Manage check fails → `PermissionDenied`
    pub fn call(
        &self,
        selected_project_id: Id,
        ticket: &Ticket,
        target_status: &TicketStatus,
    ) -> BoardResult<TicketMove> {
        let ticket_id = ticket
            .id
            .ok_or_else(|| BoardError::Internal("Cannot move an unsaved ticket".into()))?;

        if ticket.project_id != selected_project_id {
            return Err(BoardError::not_found(Ticket::TYPE_NAME, ticket_id));
        }

        let target_status_id = target_status
            .id
            .ok_or_else(|| BoardError::Internal("Target status has no id".into()))?;

        if target_status.project_id != ticket.project_id {
            tracing::warn!(
                ticket_id,
                target_status_id,
                ticket_project = ticket.project_id,
                status_project = target_status.project_id,
                "Rejecting move to a status of another project"
            );
            return Err(BoardError::not_found(
                TicketStatus::TYPE_NAME,
                target_status_id,
            ));
        }

        if !self.gate.allows(self.user, TicketAction::Manage, ticket) {
            return Err(BoardError::permission_denied(
                "You do not have permission to move this ticket.",
            ));
        }

        Ok(TicketMove {
            ticket_id,
            from_status_id: ticket.ticket_status_id,
            to_status_id: target_status_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_auth::Capability;

    fn ticket(id: Id, project_id: Id, status_id: Id, owner: Id) -> Ticket {
        let mut t = Ticket::new("Sample", project_id, status_id, owner);
        t.id = Some(id);
        t
    }

    fn status(id: Id, project_id: Id) -> TicketStatus {
        let mut s = TicketStatus::new(project_id, "Done");
        s.id = Some(id);
        s
    }

    fn owner_user(id: Id) -> CurrentUser {
        CurrentUser::new(id, "owner").with_capability(Capability::UpdateTicket)
    }

    #[test]
    fn test_owner_moves_within_project() {
        let user = owner_user(7);
        let gate = GatePolicy::default();
        let mover = MoveTicket::new(&user, &gate);

        let result = mover.call(1, &ticket(100, 1, 10, 7), &status(20, 1));
        let moved = result.unwrap();
        assert_eq!(moved.ticket_id, 100);
        assert_eq!(moved.from_status_id, 10);
        assert_eq!(moved.to_status_id, 20);
    }

    #[test]
    fn test_ticket_outside_selected_project_rejected() {
        let user = owner_user(7);
        let gate = GatePolicy::default();
        let mover = MoveTicket::new(&user, &gate);

        let err = mover
            .call(2, &ticket(100, 1, 10, 7), &status(20, 1))
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound { .. }));
    }

    #[test]
    fn test_status_of_other_project_rejected() {
        let user = owner_user(7);
        let gate = GatePolicy::default();
        let mover = MoveTicket::new(&user, &gate);

        let err = mover
            .call(1, &ticket(100, 1, 10, 7), &status(20, 2))
            .unwrap_err();
        assert!(matches!(err, BoardError::NotFound { .. }));
    }

    #[test]
    fn test_unrelated_user_denied_without_mutation() {
        let user = CurrentUser::new(4, "bystander").with_capability(Capability::UpdateTicket);
        let gate = GatePolicy::default();
        let mover = MoveTicket::new(&user, &gate);

        let err = mover
            .call(1, &ticket(100, 1, 10, 7), &status(20, 1))
            .unwrap_err();
        assert!(matches!(err, BoardError::PermissionDenied { .. }));
    }

    #[test]
    fn test_super_admin_moves_any_ticket() {
        let user = CurrentUser::super_admin(99, "root");
        let gate = GatePolicy::default();
        let mover = MoveTicket::new(&user, &gate);

        assert!(mover.call(1, &ticket(100, 1, 10, 7), &status(20, 1)).is_ok());
    }

    #[test]
    fn test_entity_names_used_in_errors() {
        // Keeps the NotFound payloads aligned with the entity type names.
        assert_eq!(Ticket::TYPE_NAME, "Ticket");
        assert_eq!(TicketStatus::TYPE_NAME, "TicketStatus");
    }
}
