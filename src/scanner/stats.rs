//! Cumulative scan statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters accumulated over every scan since startup.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub scans: u64,
    pub opportunities_reported: u64,
    pub venue_fetches: u64,
    pub venue_failures: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
}
