//! HTTP client for venues exposing a JSON price listing.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{PriceSource, Result, VenueError};
use crate::domain::PriceObservation;

/// Longest error body echoed back in a status error.
const MAX_ERROR_BODY: usize = 256;

/// One entry of a venue listing. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct Quote {
    pair: String,
    price: Decimal,
}

/// Venue reachable over HTTP GET, answering with `[{"pair": .., "price": ..}, ..]`.
/// The venue identifier is its URL.
pub struct HttpVenue {
    url: String,
    http_client: HttpClient,
}

impl HttpVenue {
    /// Creates a venue sharing the given HTTP client's connection pool.
    pub fn new(url: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            url: url.into(),
            http_client,
        }
    }

    fn status_error(status: StatusCode, body: &[u8]) -> VenueError {
        let mut message = String::from_utf8_lossy(body).trim().to_string();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("no reason").to_string();
        }

        VenueError::Status {
            code: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl PriceSource for HttpVenue {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch_prices(&self) -> Result<Vec<PriceObservation>> {
        debug!(venue = %self.url, "fetching price listing");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| VenueError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| VenueError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        let quotes: Vec<Quote> =
            serde_json::from_slice(&body).map_err(|e| VenueError::Malformed(e.to_string()))?;

        Ok(quotes
            .into_iter()
            .map(|q| PriceObservation::new(self.url.clone(), q.pair, q.price))
            .collect())
    }
}
