//! Application state shared across handlers.

use std::sync::Arc;

use crate::lyzr::{LyzrClient, RequestPacer};
use crate::settings::Settings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the upstream inference API.
    pub lyzr: Arc<LyzrClient>,
    /// Single admission queue for all outbound upstream calls. One instance
    /// per process; every inbound request goes through it.
    pub pacer: Arc<RequestPacer>,
    /// Resolved server settings.
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create new application state.
    pub fn new(lyzr: LyzrClient, pacer: RequestPacer, settings: Settings) -> Self {
        Self {
            lyzr: Arc::new(lyzr),
            pacer: Arc::new(pacer),
            settings: Arc::new(settings),
        }
    }

    /// Build state entirely from settings.
    pub fn from_settings(settings: Settings) -> Self {
        let lyzr = LyzrClient::new(settings.lyzr_config());
        let pacer = RequestPacer::new(settings.min_request_interval());
        Self::new(lyzr, pacer, settings)
    }
}
