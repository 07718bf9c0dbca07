//! Arbitrage opportunity domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opportunity represents a candidate cross-venue arbitrage for one pair:
/// buy on the cheapest venue, sell on the most expensive one.
///
/// Serialized as `{pair, buyFrom, sellTo, profit, buyPrice, sellPrice}`
/// with decimal values rendered as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    /// Trading pair (e.g., "APT/USDT").
    pub pair: String,
    /// Venue quoting the lowest price.
    #[serde(rename = "buyFrom")]
    pub buy_venue: String,
    /// Venue quoting the highest price.
    #[serde(rename = "sellTo")]
    pub sell_venue: String,
    /// Highest price minus lowest price, in venue-native units.
    #[serde(rename = "profit", with = "rust_decimal::serde::float")]
    pub spread: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub buy_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
}
