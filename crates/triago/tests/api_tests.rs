//! API integration tests.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::{mock_upstream, test_app, test_app_without_key};

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Test that the health endpoint works.
#[tokio::test]
async fn test_health_endpoint() {
    let upstream = mock_upstream(|_| (StatusCode::OK, "{}")).await;
    let app = test_app(&upstream.url);

    let response = call(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

/// Missing required fields are rejected before any upstream call.
#[tokio::test]
async fn test_agent_call_requires_message_and_agent_id() {
    let upstream = mock_upstream(|_| (StatusCode::OK, "{}")).await;
    let app = test_app(&upstream.url);

    for body in [
        json!({}),
        json!({ "message": "hello" }),
        json!({ "agent_id": "triage-agent" }),
        json!({ "message": "", "agent_id": "triage-agent" }),
        json!({ "message": "hello", "agent_id": "" }),
    ] {
        let response = call(&app, post_json("/api/agent", &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["response"]["status"], "error");
        assert_eq!(json["error"], "message and agent_id are required");
    }

    assert_eq!(upstream.hit_count(), 0);
}

/// A missing upstream credential is a configuration error, not a request.
#[tokio::test]
async fn test_agent_call_without_api_key_is_a_server_error() {
    let upstream = mock_upstream(|_| (StatusCode::OK, "{}")).await;
    let app = test_app_without_key(&upstream.url);

    let body = json!({ "message": "hello", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "LYZR_API_KEY not configured on server");
    assert_eq!(upstream.hit_count(), 0);
}

/// Happy path: upstream reply is normalized and correlation ids are echoed.
#[tokio::test]
async fn test_agent_call_success_with_generated_ids() {
    let upstream = mock_upstream(|_| {
        (
            StatusCode::OK,
            r#"{"response": {"status": "success", "result": {"urgency": "low"}}}"#,
        )
    })
    .await;
    let app = test_app(&upstream.url);

    let body = json!({ "message": "I have a mild sore throat", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["response"]["status"], "success");
    assert_eq!(json["response"]["result"]["urgency"], "low");
    assert_eq!(json["agent_id"], "triage-agent");
    assert!(json["raw_response"].is_string());
    assert!(json["timestamp"].is_string());

    // Generated identifier formats.
    let user_id = json["user_id"].as_str().unwrap();
    assert!(user_id.starts_with("user-"));
    assert_eq!(user_id.len(), 5 + 36);

    let session_id = json["session_id"].as_str().unwrap();
    let suffix = session_id.strip_prefix("triage-agent-").unwrap();
    assert_eq!(suffix.len(), 12);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(upstream.hit_count(), 1);
}

/// Generated identifiers differ across calls.
#[tokio::test]
async fn test_generated_ids_are_distinct_across_calls() {
    let upstream = mock_upstream(|_| (StatusCode::OK, r#""ok""#)).await;
    let app = test_app(&upstream.url);
    let body = json!({ "message": "hello", "agent_id": "triage-agent" });

    let first = body_json(call(&app, post_json("/api/agent", &body)).await).await;
    let second = body_json(call(&app, post_json("/api/agent", &body)).await).await;

    assert_ne!(first["user_id"], second["user_id"]);
    assert_ne!(first["session_id"], second["session_id"]);
}

/// Caller-supplied identifiers pass through untouched.
#[tokio::test]
async fn test_caller_supplied_ids_are_echoed() {
    let upstream = mock_upstream(|_| (StatusCode::OK, r#""ok""#)).await;
    let app = test_app(&upstream.url);

    let body = json!({
        "message": "hello",
        "agent_id": "triage-agent",
        "user_id": "user-fixed",
        "session_id": "triage-agent-fixedsession",
    });
    let json = body_json(call(&app, post_json("/api/agent", &body)).await).await;

    assert_eq!(json["user_id"], "user-fixed");
    assert_eq!(json["session_id"], "triage-agent-fixedsession");
}

/// A 2xx reply embedding an application failure short-circuits normalization.
#[tokio::test]
async fn test_embedded_upstream_failure() {
    let upstream =
        mock_upstream(|_| (StatusCode::OK, r#"{"success": false, "error": "agent offline"}"#))
            .await;
    let app = test_app(&upstream.url);

    let body = json!({ "message": "hello", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "agent offline");
    assert_eq!(json["response"]["status"], "error");
    assert_eq!(json["response"]["message"], "agent offline");
    assert!(json["raw_response"].is_string());
}

/// A non-2xx upstream status is surfaced verbatim with the extracted message.
#[tokio::test]
async fn test_upstream_error_status_passes_through() {
    let upstream = mock_upstream(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": "inference backend down"}"#,
        )
    })
    .await;
    let app = test_app(&upstream.url);

    let body = json!({ "message": "hello", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "inference backend down");
    assert_eq!(json["raw_response"], r#"{"error": "inference backend down"}"#);
    assert_eq!(upstream.hit_count(), 1);
}

/// An unparseable error body falls back to the generic status message.
#[tokio::test]
async fn test_upstream_error_without_json_body() {
    let upstream = mock_upstream(|_| (StatusCode::BAD_GATEWAY, "<html>oops</html>")).await;
    let app = test_app(&upstream.url);

    let body = json!({ "message": "hello", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "API returned status 502");
}

/// Persistent throttling exhausts the whole schedule and answers 429.
#[tokio::test]
async fn test_agent_call_throttling_exhausted() {
    let upstream = mock_upstream(|_| (StatusCode::TOO_MANY_REQUESTS, "busy")).await;
    let app = test_app(&upstream.url);

    let body = json!({ "message": "hello", "agent_id": "triage-agent" });
    let response = call(&app, post_json("/api/agent", &body)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Rate limit exceeded after multiple retries");
    assert!(
        json["response"]["message"]
            .as_str()
            .unwrap()
            .contains("tried 9 times")
    );
    assert!(json["details"].as_str().unwrap().contains("Attempted 9 times"));
    assert_eq!(upstream.hit_count(), 9);
}

/// History listing, filtering, and lookup.
#[tokio::test]
async fn test_history_endpoints() {
    let upstream = mock_upstream(|_| (StatusCode::OK, "{}")).await;
    let app = test_app(&upstream.url);

    let all = body_json(call(&app, get("/api/history")).await).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let moderate = body_json(call(&app, get("/api/history?urgency=moderate")).await).await;
    let moderate = moderate.as_array().unwrap();
    assert_eq!(moderate.len(), 2);
    assert!(
        moderate
            .iter()
            .all(|entry| entry["urgency_level"] == "moderate")
    );

    let response = call(&app, get("/api/history?urgency=critical")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let entry = body_json(call(&app, get("/api/history/1")).await).await;
    assert_eq!(entry["primary_complaint"], "Severe chest pain");

    let response = call(&app, get("/api/history/999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// Admin dashboard snapshot.
#[tokio::test]
async fn test_admin_stats_endpoint() {
    let upstream = mock_upstream(|_| (StatusCode::OK, "{}")).await;
    let app = test_app(&upstream.url);

    let json = body_json(call(&app, get("/api/admin/stats")).await).await;
    assert_eq!(json["total_assessments"], 1247);
    assert_eq!(json["urgency_distribution"]["high"], 89);
    assert_eq!(json["high_risk_cases"].as_array().unwrap().len(), 5);
    assert_eq!(json["high_risk_cases"][0]["status"], "In Progress");
}
