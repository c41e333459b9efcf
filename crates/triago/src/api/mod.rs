//! HTTP API module.
//!
//! Provides the agent-call gateway and the read-only triage data endpoints.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{AgentCallRequest, GatewayResult};
pub use routes::create_router;
pub use state::AppState;
