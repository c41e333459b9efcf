//! Outbound request pacing.
//!
//! The upstream inference API throttles aggressively, so every outbound call
//! in the process is admitted through a single queue with a minimum gap
//! between call starts. This is a process-wide limit, not per caller or per
//! agent: under concurrent load requests serialize behind one slot.

use std::time::{Duration, Instant};

use log::debug;
use tokio::sync::Mutex;

/// Minimum spacing between outbound upstream calls.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1500);

/// Single-slot admission queue shared by every inbound request.
#[derive(Debug)]
pub struct RequestPacer {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the minimum interval since the previous call has elapsed,
    /// then stamp the slot.
    ///
    /// The stamp is unconditional: control only returns once this call
    /// counts as the most recent one. Acquired exactly once per inbound
    /// request, before the first attempt; retries have their own backoff
    /// schedule and do not re-enter the queue. The slot is held across the
    /// wait, so concurrent callers line up behind it.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("pacing upstream call: waiting {wait:?}");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(MIN_REQUEST_INTERVAL)
    }
}
