//! Price-spread scanner.
//!
//! Fans out one fetch per venue with bounded concurrency and a per-fetch
//! timeout, then groups the surviving observations by pair and reports the
//! cheapest-to-most-expensive spread. A failing venue only loses its own
//! observations; it never fails the scan.

mod error;
mod spread;
mod stats;

pub use error::ScannerError;
pub use spread::find_opportunities;
pub use stats::ScanStats;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::stream::{self, StreamExt};
use reqwest::Client as HttpClient;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{Config, ScannerConfig};
use crate::domain::{PriceObservation, ScanReport, VenueStatus};
use crate::venues::{self, HttpVenue, PriceSource, VenueError};

/// Venue position in configured order, paired with its fetch result.
type IndexedOutcome = (usize, venues::Result<Vec<PriceObservation>>);

/// Scanner coordinates one price fetch per configured venue.
pub struct Scanner {
    /// Venues in configured order.
    venues: Vec<Arc<dyn PriceSource>>,
    fetch_timeout: Duration,
    max_concurrency: usize,
    stats: Mutex<ScanStats>,
}

impl Scanner {
    /// Creates a scanner over the given venues.
    pub fn new(venues: Vec<Arc<dyn PriceSource>>, config: &ScannerConfig) -> Self {
        Self {
            venues,
            fetch_timeout: config.fetch_timeout(),
            max_concurrency: config.max_concurrency().max(1),
            stats: Mutex::new(ScanStats::default()),
        }
    }

    /// Creates a scanner with one HTTP venue per configured URL.
    /// All venues share a single connection pool.
    pub fn from_config(config: &Config) -> Result<Self, ScannerError> {
        let http_client = HttpClient::builder()
            .connect_timeout(config.scanner.fetch_timeout())
            .build()?;

        let venues = config
            .venues
            .iter()
            .map(|url| {
                info!(venue = %url, "Registering venue");
                Arc::new(HttpVenue::new(url.clone(), http_client.clone())) as Arc<dyn PriceSource>
            })
            .collect();

        Ok(Self::new(venues, &config.scanner))
    }

    /// Returns venue identifiers in configured order.
    pub fn venues(&self) -> Vec<String> {
        self.venues.iter().map(|v| v.name().to_string()).collect()
    }

    /// Runs one full scan.
    pub async fn scan(&self) -> ScanReport {
        let started = Instant::now();

        // Boxed up front: axum handlers need the scan future to be Send.
        let fetches: Vec<BoxFuture<'static, IndexedOutcome>> = self
            .venues
            .iter()
            .cloned()
            .enumerate()
            .map(|(idx, venue)| fetch_indexed(idx, venue, self.fetch_timeout).boxed())
            .collect();

        let mut outcomes: Vec<IndexedOutcome> = stream::iter(fetches)
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; merge in configured order.
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut observations = Vec::new();
        let mut statuses = BTreeMap::new();
        let mut failures = 0;
        for (idx, outcome) in outcomes {
            let name = self.venues[idx].name().to_string();
            let status = match outcome {
                Ok(mut listing) => {
                    let status = VenueStatus::Ok {
                        observations: listing.len(),
                    };
                    observations.append(&mut listing);
                    status
                }
                Err(e) => {
                    failures += 1;
                    warn!(venue = %name, kind = e.kind(), error = %e, "Venue excluded from scan");
                    VenueStatus::Failed {
                        error: e.kind().to_string(),
                        message: e.to_string(),
                    }
                }
            };
            statuses.insert(name, status);
        }

        let opportunities = find_opportunities(&observations);
        let report = ScanReport {
            scanned_at: Utc::now(),
            opportunities,
            venues: statuses,
        };

        info!(
            venues = self.venues.len(),
            failed = report.failed_venues(),
            complete = report.is_complete(),
            observations = observations.len(),
            opportunities = report.opportunities.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scan completed"
        );

        self.record(&report, failures).await;
        report
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> ScanStats {
        self.stats.lock().await.clone()
    }

    async fn record(&self, report: &ScanReport, failures: usize) {
        let mut stats = self.stats.lock().await;
        stats.scans += 1;
        stats.opportunities_reported += report.opportunities.len() as u64;
        stats.venue_fetches += self.venues.len() as u64;
        stats.venue_failures += failures as u64;
        stats.last_scan_at = Some(report.scanned_at);
    }
}

async fn fetch_indexed(
    idx: usize,
    venue: Arc<dyn PriceSource>,
    fetch_timeout: Duration,
) -> IndexedOutcome {
    (idx, fetch_venue(venue, fetch_timeout).await)
}

/// Fetches one venue, mapping an elapsed timeout to `VenueError::Timeout`.
async fn fetch_venue(
    venue: Arc<dyn PriceSource>,
    fetch_timeout: Duration,
) -> venues::Result<Vec<PriceObservation>> {
    debug!(venue = %venue.name(), timeout = ?fetch_timeout, "Fetching venue");
    match tokio::time::timeout(fetch_timeout, venue.fetch_prices()).await {
        Ok(result) => result,
        Err(_) => Err(VenueError::Timeout(fetch_timeout)),
    }
}
