//! # tb-api
//!
//! HTTP API for TicketBoard RS: axum handlers for the board, timeline,
//! notification inbox, and export, plus error mapping and extractors.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::router;
