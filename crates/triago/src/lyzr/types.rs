//! Wire types for the agent gateway.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound payload for the inference API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub message: String,
    pub agent_id: String,
    pub user_id: String,
    pub session_id: String,
    /// Opaque attachment descriptors; omitted from the wire when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<Value>>,
}

/// Envelope status as reported to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Canonical agent response envelope.
///
/// The upstream emits several incompatible shapes; this is the only shape API
/// callers ever see. See [`crate::lyzr::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAgentResponse {
    pub status: ResponseStatus,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NormalizedAgentResponse {
    /// Error envelope with an empty result and the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            result: Value::Object(serde_json::Map::new()),
            message: Some(message.into()),
            metadata: None,
        }
    }
}

/// Classified result of a single upstream attempt.
#[derive(Debug)]
pub enum UpstreamOutcome {
    /// Any non-429 completion, success or failure. Retrying stops here.
    Completed { status: StatusCode, body: String },
    /// HTTP 429. Expected to clear, so worth waiting out.
    Throttled { body: String },
    /// The transport call itself failed before a status was received.
    TransportFailed(reqwest::Error),
}

/// Final upstream reply once the retry loop has finished.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}
