//! # tb-auth
//!
//! Identity and authorization for TicketBoard RS: bearer-token validation and
//! the typed permission gate that governs viewing, editing, and moving
//! tickets.

pub mod jwt;
pub mod policy;

pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use policy::{Capability, CurrentUser, GatePolicy, TicketAction};
