//! Configuration loading and validation for the spread gateway.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides for deployment-specific endpoints.

mod app;
mod chain;
mod duration;
mod error;
mod scanner;
mod server;

pub use app::AppConfig;
pub use chain::ChainConfig;
pub use error::ConfigError;
pub use scanner::ScannerConfig;
pub use server::ServerConfig;

use serde::Deserialize;
use std::{collections::HashSet, env, fs, time::Duration};

/// Root configuration structure for the gateway.
///
/// Required sections: app.
/// Optional sections: server, venues, scanner, chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// REST API listen address (optional).
    #[serde(default)]
    pub server: ServerConfig,
    /// Ordered list of venue price endpoints. An empty list is valid.
    #[serde(default)]
    pub venues: Vec<String>,
    /// Venue fan-out settings (optional).
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// Aptos fullnode used by the account and transaction endpoints (optional).
    pub chain: Option<ChainConfig>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads YAML config and applies overrides from environment variables:
    /// - `VENUE_URLS` (comma-separated, replaces `venues`)
    /// - `PORT`
    /// - `APTOS_NODE_URL`
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies overrides using the given variable lookup.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(urls) = lookup("VENUE_URLS") {
            self.venues = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Override {
                    var: "PORT",
                    reason: format!("{:?} is not a port number", port),
                })?;
        }

        if let Some(node_url) = lookup("APTOS_NODE_URL") {
            match self.chain {
                Some(ref mut chain) => chain.node_url = node_url,
                None => self.chain = Some(ChainConfig::new(node_url)),
            }
        }

        Ok(())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be positive".into()));
        }

        let mut seen = HashSet::new();
        for (i, venue) in self.venues.iter().enumerate() {
            if venue.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "venues[{}]: url must not be empty",
                    i
                )));
            }
            if !seen.insert(venue.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "venues[{}]: duplicate url {}",
                    i, venue
                )));
            }
        }

        if self.scanner.fetch_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Validation(
                "scanner.fetch_timeout must be positive".into(),
            ));
        }

        if self.scanner.max_concurrency() == 0 {
            return Err(ConfigError::Validation(
                "scanner.max_concurrency must be positive".into(),
            ));
        }

        if let Some(ref chain) = self.chain {
            if chain.node_url.trim().is_empty() {
                return Err(ConfigError::Validation("chain.node_url is required".into()));
            }
            if chain.request_timeout == Some(Duration::ZERO) {
                return Err(ConfigError::Validation(
                    "chain.request_timeout must be positive".into(),
                ));
            }
        }

        Ok(())
    }
}
