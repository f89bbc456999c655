//! HTTP API module for the Experience Consolidation Engine.
//!
//! Exposes the stored summaries to the reporting and UI layers and the
//! recompute trigger used by the form collaborator.

mod handlers;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
