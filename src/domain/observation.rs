//! Price observations collected from venues during a scan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price quoted by a venue for a trading pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Venue identifier (its endpoint URL).
    pub venue: String,
    /// Trading pair as reported by the venue (e.g., "APT/USDT").
    pub pair: String,
    /// Quoted price in venue-native units.
    pub price: Decimal,
}

impl PriceObservation {
    pub fn new(venue: impl Into<String>, pair: impl Into<String>, price: Decimal) -> Self {
        Self {
            venue: venue.into(),
            pair: pair.into(),
            price,
        }
    }
}
