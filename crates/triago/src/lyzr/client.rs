//! Retrying HTTP client for the Lyzr inference API.

use std::env;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};

use super::error::{AgentCallError, AgentCallResult};
use super::types::{ChatPayload, UpstreamOutcome, UpstreamReply};

/// Default upstream inference endpoint.
pub const DEFAULT_API_URL: &str = "https://agent-prod.studio.lyzr.ai/v3/inference/chat/";

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "LYZR_API_KEY";

/// Client configuration. `Default` carries the production constants; tests
/// inject small delays.
#[derive(Debug, Clone)]
pub struct LyzrConfig {
    /// Upstream inference endpoint URL.
    pub api_url: String,
    /// Explicit key override. When `None`, `LYZR_API_KEY` is consulted per
    /// request.
    pub api_key: Option<String>,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// First backoff delay.
    pub initial_delay: Duration,
    /// Backoff ceiling.
    pub max_delay: Duration,
}

impl Default for LyzrConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            max_retries: 8,
            initial_delay: Duration::from_millis(3000),
            max_delay: Duration::from_millis(45_000),
        }
    }
}

impl LyzrConfig {
    /// Total attempts: the initial call plus every retry.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Time spent sleeping if the whole schedule runs.
    pub fn worst_case_backoff(&self) -> Duration {
        let mut delay = self.initial_delay;
        let mut total = Duration::ZERO;
        for _ in 0..self.max_retries {
            total += delay;
            delay = next_delay(delay, self.max_delay);
        }
        total
    }

    /// User-facing message once throttling has outlasted the whole schedule.
    /// Derived from the schedule constants so it stays in sync when they are
    /// tuned.
    pub fn exhausted_message(&self) -> String {
        let minutes = self.worst_case_backoff().as_secs() / 60;
        format!(
            "Service is experiencing very high demand. The system tried {} times over {}+ minutes. \
             Please wait and try again.",
            self.total_attempts(),
            minutes
        )
    }
}

/// Grow the backoff 1.5x per retry, up to the ceiling.
fn next_delay(current: Duration, cap: Duration) -> Duration {
    current.mul_f64(1.5).min(cap)
}

/// Client for the upstream inference API.
///
/// Retries throttling (429) and transport failures on an exponential
/// schedule. Every other status, success or not, terminates the loop
/// immediately.
#[derive(Debug)]
pub struct LyzrClient {
    http: Client,
    config: LyzrConfig,
}

impl LyzrClient {
    pub fn new(config: LyzrConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    pub fn config(&self) -> &LyzrConfig {
        &self.config
    }

    /// Whether an upstream credential is available right now.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Resolve the API key: explicit override first, then the environment.
    /// Read per request so a key provisioned after startup is picked up.
    fn api_key(&self) -> Option<String> {
        self.config
            .api_key
            .clone()
            .or_else(|| env::var(API_KEY_ENV).ok())
            .filter(|key| !key.is_empty())
    }

    /// Send a chat payload through the bounded retry loop.
    ///
    /// Returns the final upstream reply whatever its status; only throttling
    /// exhaustion, transport exhaustion, and a missing key are errors.
    pub async fn send(&self, payload: &ChatPayload) -> AgentCallResult<UpstreamReply> {
        let api_key = self.api_key().ok_or(AgentCallError::MissingApiKey)?;

        let mut delay = self.config.initial_delay;
        let mut attempt: u32 = 0;

        loop {
            match self.attempt(payload, &api_key).await {
                UpstreamOutcome::Completed { status, body } => {
                    debug!("upstream completed with status {status}");
                    return Ok(UpstreamReply { status, body });
                }
                UpstreamOutcome::Throttled { body } => {
                    if attempt >= self.config.max_retries {
                        warn!(
                            "upstream still throttling after {} attempts",
                            self.config.total_attempts()
                        );
                        debug!("final throttle body: {body}");
                        return Err(AgentCallError::ThrottlingExhausted {
                            attempts: self.config.total_attempts(),
                        });
                    }
                    info!(
                        "upstream throttled (429), retrying in {delay:?} (attempt {}/{})",
                        attempt + 1,
                        self.config.max_retries
                    );
                }
                UpstreamOutcome::TransportFailed(err) => {
                    if attempt >= self.config.max_retries {
                        return Err(AgentCallError::UpstreamUnreachable(err));
                    }
                    warn!("transport failure calling upstream: {err}; retrying in {delay:?}");
                }
            }

            tokio::time::sleep(delay).await;
            delay = next_delay(delay, self.config.max_delay);
            attempt += 1;
        }
    }

    /// One attempt, classified. The body is read regardless of status: it is
    /// needed for both success parsing and error-message extraction.
    async fn attempt(&self, payload: &ChatPayload, api_key: &str) -> UpstreamOutcome {
        let response = match self
            .http
            .post(&self.config.api_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", api_key)
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return UpstreamOutcome::TransportFailed(err),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            Err(err) => return UpstreamOutcome::TransportFailed(err),
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            UpstreamOutcome::Throttled { body }
        } else {
            UpstreamOutcome::Completed { status, body }
        }
    }
}
