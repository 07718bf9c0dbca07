//! Spread computation over one scan's observations.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use crate::domain::{Opportunity, PriceObservation};

/// Groups observations by pair and reports, for every pair seen at least twice,
/// the spread between the cheapest and the most expensive quote.
///
/// Pairs with a single observation or a zero spread are skipped. Sorting is
/// stable, so on ties the earliest observation is the buy side and the latest
/// one is the sell side. Output is ordered by pair. A pair whose spread does not
/// fit in a `Decimal` is skipped with a warning.
pub fn find_opportunities(observations: &[PriceObservation]) -> Vec<Opportunity> {
    let mut by_pair: BTreeMap<&str, Vec<&PriceObservation>> = BTreeMap::new();
    for obs in observations {
        by_pair.entry(obs.pair.as_str()).or_default().push(obs);
    }

    by_pair
        .into_iter()
        .filter(|(_, quotes)| quotes.len() >= 2)
        .filter_map(|(pair, mut quotes)| {
            quotes.sort_by(|a, b| a.price.cmp(&b.price));
            let buy = quotes.first()?;
            let sell = quotes.last()?;
            let Some(spread) = sell.price.checked_sub(buy.price) else {
                warn!(
                    pair,
                    buy_price = %buy.price,
                    sell_price = %sell.price,
                    "Spread overflows, pair skipped"
                );
                return None;
            };
            if spread <= Decimal::ZERO {
                return None;
            }
            Some(Opportunity {
                pair: pair.to_string(),
                buy_venue: buy.venue.clone(),
                sell_venue: sell.venue.clone(),
                spread,
                buy_price: buy.price,
                sell_price: sell.price,
            })
        })
        .collect()
}
