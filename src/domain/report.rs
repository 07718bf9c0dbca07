//! Scan results: opportunities plus per-venue outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Opportunity;

/// Outcome of fetching one venue during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VenueStatus {
    /// The venue responded with a well-formed listing.
    Ok { observations: usize },
    /// The venue was excluded from this scan.
    Failed { error: String, message: String },
}

impl VenueStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, VenueStatus::Ok { .. })
    }
}

/// ScanReport is the full result of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub opportunities: Vec<Opportunity>,
    /// Keyed by venue identifier.
    pub venues: BTreeMap<String, VenueStatus>,
}

impl ScanReport {
    /// Returns true if every configured venue responded.
    pub fn is_complete(&self) -> bool {
        self.venues.values().all(VenueStatus::is_ok)
    }

    /// Number of venues excluded from the scan.
    pub fn failed_venues(&self) -> usize {
        self.venues.values().filter(|s| !s.is_ok()).count()
    }
}
