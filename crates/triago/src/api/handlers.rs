//! API request handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::llm_json;
use crate::lyzr::{AgentCallError, ChatPayload, NormalizedAgentResponse, normalize};
use crate::triage::{self, AdminStats, HistoryEntry, UrgencyLevel};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Inbound agent call. Fields are individually optional so validation can
/// answer with the gateway envelope instead of a framework rejection.
#[derive(Debug, Deserialize)]
pub struct AgentCallRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<Value>>,
}

/// Outer envelope returned to the HTTP caller for every agent call.
///
/// `success` is false only for validation failures, configuration failures,
/// exhausted retries, or a final non-2xx upstream status. An upstream that
/// reports a semantic error inside a 2xx reply still yields `success: true`
/// with `response.status == "error"`, so the caller can tell transport apart
/// from agent judgment.
#[derive(Debug, Serialize)]
pub struct GatewayResult {
    pub success: bool,
    pub response: NormalizedAgentResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GatewayResult {
    /// Minimal failure envelope: an error response plus the error string.
    fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: NormalizedAgentResponse::error(message),
            agent_id: None,
            user_id: None,
            session_id: None,
            timestamp: None,
            raw_response: None,
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Agent-call gateway endpoint.
///
/// Validates, resolves correlation identifiers, paces the outbound call,
/// sends through the retrying client, and shapes the final envelope. Every
/// failure path answers with a well-formed [`GatewayResult`].
pub async fn call_agent(
    State(state): State<AppState>,
    Json(request): Json<AgentCallRequest>,
) -> (StatusCode, Json<GatewayResult>) {
    let (Some(message), Some(agent_id)) = (
        request.message.filter(|m| !m.is_empty()),
        request.agent_id.filter(|a| !a.is_empty()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(GatewayResult::failure(
                "message and agent_id are required",
                "message and agent_id are required",
            )),
        );
    };

    // Checked before any network work so a misconfigured server fails fast.
    if !state.lyzr.has_api_key() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GatewayResult::failure(
                "LYZR_API_KEY not configured",
                "LYZR_API_KEY not configured on server",
            )),
        );
    }

    let user_id = request
        .user_id
        .filter(|u| !u.is_empty())
        .unwrap_or_else(generate_user_id);
    let session_id = request
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| generate_session_id(&agent_id));

    let payload = ChatPayload {
        message,
        agent_id: agent_id.clone(),
        user_id: user_id.clone(),
        session_id: session_id.clone(),
        assets: request.assets.filter(|assets| !assets.is_empty()),
    };

    info!("agent call: agent={agent_id} session={session_id}");

    // One admission per inbound request; retries inside the client have
    // their own schedule.
    state.pacer.acquire().await;

    let reply = match state.lyzr.send(&payload).await {
        Ok(reply) => reply,
        Err(AgentCallError::ThrottlingExhausted { .. }) => {
            let config = state.lyzr.config();
            let mut result =
                GatewayResult::failure(config.exhausted_message(), "Rate limit exceeded after multiple retries");
            result.details = Some(format!(
                "Attempted {} times with extended delays. The API may be temporarily overloaded.",
                config.total_attempts()
            ));
            return (StatusCode::TOO_MANY_REQUESTS, Json(result));
        }
        Err(err) => {
            let message = err.to_string();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GatewayResult::failure(message.clone(), message)),
            );
        }
    };

    if reply.status.is_success() {
        let parsed = llm_json::extract(&reply.body);

        // A 2xx reply can still embed an application-level failure; that
        // short-circuits normalization.
        if let Some(error) = embedded_error(parsed.as_ref()) {
            let mut result = GatewayResult::failure(error.clone(), error);
            result.raw_response = Some(reply.body);
            return (StatusCode::OK, Json(result));
        }

        let normalized = normalize(parsed.as_ref());
        (
            StatusCode::OK,
            Json(GatewayResult {
                success: true,
                response: normalized,
                agent_id: Some(agent_id),
                user_id: Some(user_id),
                session_id: Some(session_id),
                timestamp: Some(Utc::now().to_rfc3339()),
                raw_response: Some(reply.body),
                error: None,
                details: None,
            }),
        )
    } else {
        let error = upstream_error_message(&reply.body)
            .unwrap_or_else(|| format!("API returned status {}", reply.status.as_u16()));
        let mut result = GatewayResult::failure(error.clone(), error);
        result.raw_response = Some(reply.body);
        // The upstream's own status is passed through verbatim.
        (reply.status, Json(result))
    }
}

/// An upstream application error embedded in a 2xx body:
/// `{"success": false, "error": "..."}`.
fn embedded_error(parsed: Option<&Value>) -> Option<String> {
    let value = parsed?;
    if value.get("success")? == &Value::Bool(false) {
        value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    }
}

/// Best-effort error message from a non-2xx body.
fn upstream_error_message(body: &str) -> Option<String> {
    let parsed = llm_json::extract(body)?;
    parsed
        .get("error")
        .or_else(|| parsed.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn generate_user_id() -> String {
    format!("user-{}", Uuid::new_v4())
}

fn generate_session_id(agent_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", agent_id, &suffix[..12])
}

/// History list filter.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub urgency: Option<String>,
}

/// List past assessments, optionally filtered by urgency.
pub async fn list_history(
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let entries = triage::sample_history();
    match query.urgency.as_deref() {
        None | Some("all") => Ok(Json(entries)),
        Some(raw) => {
            let level: UrgencyLevel = raw.parse().map_err(ApiError::BadRequest)?;
            Ok(Json(
                entries
                    .into_iter()
                    .filter(|entry| entry.urgency_level == level)
                    .collect(),
            ))
        }
    }
}

/// Fetch a single assessment by id.
pub async fn get_history_entry(Path(id): Path<String>) -> ApiResult<Json<HistoryEntry>> {
    triage::sample_history()
        .into_iter()
        .find(|entry| entry.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("history entry not found: {id}")))
}

/// Admin dashboard snapshot.
pub async fn admin_stats() -> Json<AdminStats> {
    Json(triage::admin_stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_user_id_format() {
        let id = generate_user_id();
        assert!(id.starts_with("user-"));
        // "user-" plus a hyphenated UUIDv4.
        assert_eq!(id.len(), 5 + 36);
        assert_ne!(generate_user_id(), id);
    }

    #[test]
    fn test_generated_session_id_format() {
        let id = generate_session_id("triage-agent");
        let suffix = id.strip_prefix("triage-agent-").unwrap();
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_session_id("triage-agent"), id);
    }

    #[test]
    fn test_embedded_error_requires_success_false() {
        let body = serde_json::json!({ "success": false, "error": "agent offline" });
        assert_eq!(embedded_error(Some(&body)).as_deref(), Some("agent offline"));

        let ok_body = serde_json::json!({ "success": true, "error": "ignored" });
        assert_eq!(embedded_error(Some(&ok_body)), None);
        assert_eq!(embedded_error(None), None);
    }

    #[test]
    fn test_upstream_error_message_prefers_error_field() {
        let body = r#"{"error": "bad key", "message": "secondary"}"#;
        assert_eq!(upstream_error_message(body).as_deref(), Some("bad key"));

        let message_only = r#"{"message": "try later"}"#;
        assert_eq!(
            upstream_error_message(message_only).as_deref(),
            Some("try later")
        );

        assert_eq!(upstream_error_message("not json"), None);
    }
}
