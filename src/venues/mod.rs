//! Venue integration: the price-listing collaborator the scanner fans out to.

mod http;

use crate::domain::PriceObservation;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use http::HttpVenue;

/// Venue errors. Every variant excludes the venue from the current scan.
#[derive(Debug, Error)]
pub enum VenueError {
    /// Network failure before a response was received.
    #[error("venue unreachable: {0}")]
    Unreachable(String),

    /// The venue answered with a non-2xx status.
    #[error("venue returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body is not a list of `{pair, price}` entries.
    #[error("malformed venue payload: {0}")]
    Malformed(String),

    /// No response within the per-fetch timeout.
    #[error("venue did not respond within {0:?}")]
    Timeout(Duration),
}

impl VenueError {
    /// Stable identifier used in per-venue scan statuses.
    pub fn kind(&self) -> &'static str {
        match self {
            VenueError::Unreachable(_) | VenueError::Status { .. } => "unreachable",
            VenueError::Malformed(_) => "malformed_payload",
            VenueError::Timeout(_) => "timeout",
        }
    }
}

/// Result type for venue operations.
pub type Result<T> = std::result::Result<T, VenueError>;

/// PriceSource is one venue quoting prices for a set of trading pairs.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Name returns the venue identifier reported in opportunities.
    fn name(&self) -> &str;

    /// FetchPrices retrieves the venue's current listing.
    /// Every returned observation is tagged with `name()`.
    async fn fetch_prices(&self) -> Result<Vec<PriceObservation>>;
}
