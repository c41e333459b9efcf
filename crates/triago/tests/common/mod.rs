//! Test utilities and common setup.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;

use triago::api::{AppState, create_router};
use triago::lyzr::{LyzrClient, LyzrConfig, RequestPacer};
use triago::settings::Settings;

/// A stubbed upstream inference endpoint with a hit counter.
pub struct MockUpstream {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Spawn a local upstream stub. `respond` maps the zero-based hit index to a
/// status and body.
pub async fn mock_upstream(
    respond: impl Fn(usize) -> (StatusCode, &'static str) + Clone + Send + Sync + 'static,
) -> MockUpstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new().route(
        "/",
        post(move || {
            let respond = respond.clone();
            let counter = counter.clone();
            async move {
                let hit = counter.fetch_add(1, Ordering::SeqCst);
                respond(hit)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        url: format!("http://{addr}/"),
        hits,
    }
}

fn test_config(api_url: &str, api_key: Option<String>) -> LyzrConfig {
    LyzrConfig {
        api_url: api_url.to_string(),
        api_key,
        max_retries: 8,
        initial_delay: Duration::from_millis(2),
        max_delay: Duration::from_millis(10),
    }
}

fn build_app(api_url: &str, api_key: Option<String>) -> Router {
    let settings = Settings {
        lyzr_api_url: api_url.to_string(),
        min_request_interval_ms: 5,
        ..Settings::default()
    };
    let lyzr = LyzrClient::new(test_config(api_url, api_key));
    let pacer = RequestPacer::new(settings.min_request_interval());
    create_router(AppState::new(lyzr, pacer, settings))
}

/// Test application wired to the given upstream URL.
pub fn test_app(api_url: &str) -> Router {
    build_app(api_url, Some("test-key".to_string()))
}

/// Test application with no upstream credential available. The empty
/// override blocks the environment fallback, so the result is hermetic.
pub fn test_app_without_key(api_url: &str) -> Router {
    build_app(api_url, Some(String::new()))
}
