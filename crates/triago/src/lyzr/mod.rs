//! Lyzr Studio inference client module.
//!
//! Everything between the gateway endpoint and the upstream agent API:
//! outbound pacing, the retrying HTTP client, and response normalization.

mod client;
mod error;
mod limit;
mod normalize;
mod types;

pub use client::{API_KEY_ENV, DEFAULT_API_URL, LyzrClient, LyzrConfig};
pub use error::{AgentCallError, AgentCallResult};
pub use limit::{MIN_REQUEST_INTERVAL, RequestPacer};
pub use normalize::normalize;
pub use types::*;
