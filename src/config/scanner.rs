//! Price-spread scanner configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Scanner fan-out settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Upper bound on a single venue fetch (default: 5s). Must not be zero.
    #[serde(default, with = "duration")]
    pub fetch_timeout: Option<Duration>,
    /// Maximum number of venue fetches in flight (default: 8).
    pub max_concurrency: Option<usize>,
}

impl ScannerConfig {
    /// Per-fetch timeout, falling back to the default when unset.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    /// Fan-out width, falling back to the default when unset.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
            max_concurrency: Some(DEFAULT_MAX_CONCURRENCY),
        }
    }
}
