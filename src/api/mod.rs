//! REST API over the scanner and the chain client.

mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::chain::{AccountBalance, ChainClient, TransactionStatus};
use crate::domain::{Opportunity, ScanReport};
use crate::scanner::{ScanStats, Scanner};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub chain: Option<Arc<dyn ChainClient>>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/arbitrage", get(get_opportunities))
        .route("/api/arbitrage/report", get(get_scan_report))
        .route("/api/stats", get(get_stats))
        .route("/api/accounts/:address/balance", get(get_balance))
        .route("/api/transactions/:hash", get(get_transaction))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ===== Route Handlers =====

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Runs one scan and returns only the opportunities.
async fn get_opportunities(State(state): State<AppState>) -> Json<Vec<Opportunity>> {
    Json(state.scanner.scan().await.opportunities)
}

/// Runs one scan and returns opportunities together with per-venue status.
async fn get_scan_report(State(state): State<AppState>) -> Json<ScanReport> {
    Json(state.scanner.scan().await)
}

async fn get_stats(State(state): State<AppState>) -> Json<ScanStats> {
    Json(state.scanner.stats().await)
}

async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AccountBalance>, ApiError> {
    let chain = state.chain.ok_or(ApiError::ChainUnavailable)?;
    Ok(Json(chain.get_balance(&address).await?))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionStatus>, ApiError> {
    let chain = state.chain.ok_or(ApiError::ChainUnavailable)?;
    Ok(Json(chain.get_transaction(&hash).await?))
}

// ===== Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{self, ChainError, TransactionState};
    use crate::config::ScannerConfig;
    use crate::domain::PriceObservation;
    use crate::venues::{self, PriceSource, VenueError};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::str::FromStr;
    use tower::ServiceExt;

    struct StaticVenue {
        name: &'static str,
        quotes: Option<Vec<(&'static str, &'static str)>>,
    }

    #[async_trait]
    impl PriceSource for StaticVenue {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_prices(&self) -> venues::Result<Vec<PriceObservation>> {
            match &self.quotes {
                Some(quotes) => Ok(quotes
                    .iter()
                    .map(|(pair, price)| {
                        PriceObservation::new(self.name, *pair, Decimal::from_str(price).unwrap())
                    })
                    .collect()),
                None => Err(VenueError::Unreachable("connection refused".into())),
            }
        }
    }

    struct MockChain;

    #[async_trait]
    impl ChainClient for MockChain {
        async fn get_balance(&self, address: &str) -> chain::Result<AccountBalance> {
            chain::validate_address(address)?;
            if address != "0x1" {
                return Err(ChainError::NotFound(format!("account {}", address)));
            }
            Ok(AccountBalance {
                address: address.to_string(),
                coin_type: "0x1::aptos_coin::AptosCoin".to_string(),
                balance: 42,
            })
        }

        async fn get_transaction(&self, hash: &str) -> chain::Result<TransactionStatus> {
            Ok(TransactionStatus {
                hash: hash.to_string(),
                state: TransactionState::Pending,
                version: None,
                vm_status: None,
            })
        }
    }

    fn app(venues: Vec<StaticVenue>, chain: Option<Arc<dyn ChainClient>>) -> Router {
        let venues = venues
            .into_iter()
            .map(|v| Arc::new(v) as Arc<dyn PriceSource>)
            .collect();
        create_router(AppState {
            scanner: Arc::new(Scanner::new(venues, &ScannerConfig::default())),
            chain,
        })
    }

    fn two_venues() -> Vec<StaticVenue> {
        vec![
            StaticVenue {
                name: "venue1",
                quotes: Some(vec![("APT/USDT", "10")]),
            },
            StaticVenue {
                name: "venue2",
                quotes: Some(vec![("APT/USDT", "10.5")]),
            },
        ]
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app(vec![], None);

        let (status, body) = get_json(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_arbitrage_returns_opportunity_array() {
        let app = app(two_venues(), None);

        let (status, body) = get_json(&app, "/api/arbitrage").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "pair": "APT/USDT",
                "buyFrom": "venue1",
                "sellTo": "venue2",
                "profit": 0.5,
                "buyPrice": 10.0,
                "sellPrice": 10.5,
            }])
        );
    }

    #[tokio::test]
    async fn test_arbitrage_without_venues_is_empty_success() {
        let app = app(vec![], None);

        let (status, body) = get_json(&app, "/api/arbitrage").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_report_includes_venue_status() {
        let mut venues = two_venues();
        venues.push(StaticVenue {
            name: "venue3",
            quotes: None,
        });
        let app = app(venues, None);

        let (status, body) = get_json(&app, "/api/arbitrage/report").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["opportunities"].as_array().unwrap().len(), 1);
        assert_eq!(body["venues"]["venue1"], json!({"status": "ok", "observations": 1}));
        assert_eq!(body["venues"]["venue3"]["status"], "failed");
        assert_eq!(body["venues"]["venue3"]["error"], "unreachable");
        assert!(body["scannedAt"].is_string());
    }

    #[tokio::test]
    async fn test_stats_after_scan() {
        let app = app(two_venues(), None);

        get_json(&app, "/api/arbitrage").await;
        let (status, body) = get_json(&app, "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["scans"], 1);
        assert_eq!(body["opportunitiesReported"], 1);
        assert_eq!(body["venueFetches"], 2);
        assert_eq!(body["venueFailures"], 0);
    }

    #[tokio::test]
    async fn test_balance_endpoint() {
        let app = app(vec![], Some(Arc::new(MockChain)));

        let (status, body) = get_json(&app, "/api/accounts/0x1/balance").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"address": "0x1", "coinType": "0x1::aptos_coin::AptosCoin", "balance": 42})
        );
    }

    #[tokio::test]
    async fn test_balance_invalid_address() {
        let app = app(vec![], Some(Arc::new(MockChain)));

        let (status, body) = get_json(&app, "/api/accounts/alice/balance").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("0x"));
    }

    #[tokio::test]
    async fn test_balance_unknown_account() {
        let app = app(vec![], Some(Arc::new(MockChain)));

        let (status, _) = get_json(&app, "/api/accounts/0x2/balance").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transaction_endpoint() {
        let app = app(vec![], Some(Arc::new(MockChain)));

        let (status, body) = get_json(&app, "/api/transactions/0xabc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "pending");
        assert_eq!(body["version"], Value::Null);
    }

    #[tokio::test]
    async fn test_chain_endpoints_without_client() {
        let app = app(vec![], None);

        let (status, body) = get_json(&app, "/api/transactions/0xabc").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "chain client not configured");
    }
}
