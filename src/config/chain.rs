//! Aptos fullnode configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Coin type whose balance is reported when none is configured.
pub const DEFAULT_COIN_TYPE: &str = "0x1::aptos_coin::AptosCoin";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fullnode REST endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Base URL of the fullnode REST API, including the `/v1` prefix.
    pub node_url: String,
    /// Coin type queried by the balance endpoint.
    #[serde(default = "default_coin_type")]
    pub coin_type: String,
    /// Per-request timeout (default: 10s). Must not be zero.
    #[serde(default, with = "duration")]
    pub request_timeout: Option<Duration>,
}

impl ChainConfig {
    pub fn new(node_url: String) -> Self {
        Self {
            node_url,
            coin_type: default_coin_type(),
            request_timeout: None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

fn default_coin_type() -> String {
    DEFAULT_COIN_TYPE.to_string()
}
