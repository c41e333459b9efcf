//! Agent call error types.

use thiserror::Error;

/// Result type for agent call operations.
pub type AgentCallResult<T> = Result<T, AgentCallError>;

/// Errors that terminate an agent call without a usable upstream reply.
///
/// A non-2xx upstream status is not an error at this layer: the reply body is
/// still needed for error-message extraction, so it travels back as data.
#[derive(Debug, Error)]
pub enum AgentCallError {
    /// Upstream credential missing from the environment.
    #[error("LYZR_API_KEY not configured")]
    MissingApiKey,

    /// Upstream kept throttling through the entire retry schedule.
    #[error("rate limit persisted after {attempts} attempts")]
    ThrottlingExhausted { attempts: u32 },

    /// Transport failure persisted through the entire retry schedule.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),
}
