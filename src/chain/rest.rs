//! HTTP client for the Aptos fullnode REST API.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    AccountBalance, ChainClient, ChainError, Result, TransactionState, TransactionStatus,
    validate_address, validate_hash,
};
use crate::config::ChainConfig;

/// Transaction `type` reported while a transaction is still in the mempool.
const PENDING_TRANSACTION: &str = "pending_transaction";

#[derive(Deserialize)]
struct CoinStoreResource {
    data: CoinStoreData,
}

#[derive(Deserialize)]
struct CoinStoreData {
    coin: CoinValue,
}

#[derive(Deserialize)]
struct CoinValue {
    value: String,
}

#[derive(Deserialize)]
struct TransactionResponse {
    #[serde(rename = "type")]
    kind: String,
    hash: String,
    version: Option<String>,
    success: Option<bool>,
    vm_status: Option<String>,
}

/// Read-only client for a fullnode's `/v1` REST API.
pub struct AptosRestClient {
    base_url: String,
    coin_type: String,
    http_client: HttpClient,
}

impl AptosRestClient {
    /// Creates a new client from chain config.
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: config.node_url.trim_end_matches('/').to_string(),
            coin_type: config.coin_type.clone(),
            http_client,
        })
    }

    /// Sends a GET request and decodes the JSON body.
    /// `what` names the looked-up entity in `NotFound` errors.
    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "sending request");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ChainError::Connection(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(ChainError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| ChainError::Decode(e.to_string()))
    }

    /// Creates a ChainError from an error response.
    fn parse_error_response(&self, status: StatusCode, body: &[u8]) -> ChainError {
        #[derive(Deserialize)]
        struct ErrorResponse {
            message: Option<String>,
            error_code: Option<String>,
        }

        let message = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(ErrorResponse {
                message: Some(message),
                error_code: Some(code),
            }) => format!("{} ({})", message, code),
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            _ => String::from_utf8_lossy(body).to_string(),
        };

        warn!(code = status.as_u16(), message = %message, "node error");

        ChainError::Node {
            code: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl ChainClient for AptosRestClient {
    async fn get_balance(&self, address: &str) -> Result<AccountBalance> {
        validate_address(address)?;

        let resource = format!("0x1::coin::CoinStore<{}>", self.coin_type);
        let path = format!(
            "/accounts/{}/resource/{}",
            address,
            urlencoding::encode(&resource)
        );
        let store: CoinStoreResource = self
            .get(&path, &format!("{} for account {}", resource, address))
            .await?;

        let balance = store
            .data
            .coin
            .value
            .parse::<u64>()
            .map_err(|_| ChainError::Decode(format!("coin value {:?}", store.data.coin.value)))?;

        Ok(AccountBalance {
            address: address.to_string(),
            coin_type: self.coin_type.clone(),
            balance,
        })
    }

    async fn get_transaction(&self, hash: &str) -> Result<TransactionStatus> {
        validate_hash(hash)?;

        let tx: TransactionResponse = self
            .get(
                &format!("/transactions/by_hash/{}", hash),
                &format!("transaction {}", hash),
            )
            .await?;

        let state = if tx.kind == PENDING_TRANSACTION {
            TransactionState::Pending
        } else {
            match tx.success {
                Some(true) => TransactionState::Success,
                Some(false) => TransactionState::Failed,
                None => {
                    return Err(ChainError::Decode(format!(
                        "{} without success flag",
                        tx.kind
                    )));
                }
            }
        };

        let version = tx
            .version
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| ChainError::Decode(format!("transaction version {:?}", v)))
            })
            .transpose()?;

        Ok(TransactionStatus {
            hash: tx.hash,
            state,
            version,
            vm_status: tx.vm_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::StatusCode as AxumStatus,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    const ACCOUNT: &str = "0xa11ce";
    const COMMITTED: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const ABORTED: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
    const PENDING: &str = "0x3333333333333333333333333333333333333333333333333333333333333333";
    const BROKEN: &str = "0x4444444444444444444444444444444444444444444444444444444444444444";

    async fn resource(Path((address, resource)): Path<(String, String)>) -> Response {
        if address != ACCOUNT {
            return (
                AxumStatus::NOT_FOUND,
                Json(json!({"message": "Account not found", "error_code": "account_not_found"})),
            )
                .into_response();
        }
        assert_eq!(resource, "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>");
        Json(json!({
            "type": resource,
            "data": {"coin": {"value": "150000000"}, "frozen": false}
        }))
        .into_response()
    }

    async fn transaction(Path(hash): Path<String>) -> Response {
        let body = match hash.as_str() {
            COMMITTED => json!({
                "type": "user_transaction", "hash": hash, "version": "987654",
                "success": true, "vm_status": "Executed successfully"
            }),
            ABORTED => json!({
                "type": "user_transaction", "hash": hash, "version": "987655",
                "success": false, "vm_status": "Move abort in 0x1::coin: EINSUFFICIENT_BALANCE"
            }),
            PENDING => json!({"type": "pending_transaction", "hash": hash}),
            BROKEN => {
                return (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "storage unavailable", "error_code": "internal_error"})),
                )
                    .into_response();
            }
            _ => return AxumStatus::NOT_FOUND.into_response(),
        };
        Json(body).into_response()
    }

    async fn node() -> AptosRestClient {
        let router = Router::new()
            .route("/v1/accounts/:address/resource/:resource", get(resource))
            .route("/v1/transactions/by_hash/:hash", get(transaction));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        AptosRestClient::new(&ChainConfig::new(format!("http://{}/v1/", addr))).unwrap()
    }

    #[tokio::test]
    async fn test_get_balance() {
        let client = node().await;

        let balance = client.get_balance(ACCOUNT).await.unwrap();

        assert_eq!(
            balance,
            AccountBalance {
                address: ACCOUNT.to_string(),
                coin_type: "0x1::aptos_coin::AptosCoin".to_string(),
                balance: 150_000_000,
            }
        );
    }

    #[tokio::test]
    async fn test_get_balance_unknown_account() {
        let client = node().await;

        let result = client.get_balance("0xb0b").await;

        assert!(matches!(result, Err(ChainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_balance_rejects_bad_address_without_request() {
        let client = node().await;

        let result = client.get_balance("alice").await;

        assert!(matches!(result, Err(ChainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_committed_transaction() {
        let client = node().await;

        let status = client.get_transaction(COMMITTED).await.unwrap();

        assert_eq!(status.state, TransactionState::Success);
        assert_eq!(status.version, Some(987654));
        assert_eq!(status.vm_status.as_deref(), Some("Executed successfully"));
    }

    #[tokio::test]
    async fn test_get_aborted_transaction() {
        let client = node().await;

        let status = client.get_transaction(ABORTED).await.unwrap();

        assert_eq!(status.state, TransactionState::Failed);
    }

    #[tokio::test]
    async fn test_get_pending_transaction() {
        let client = node().await;

        let status = client.get_transaction(PENDING).await.unwrap();

        assert_eq!(status.state, TransactionState::Pending);
        assert_eq!(status.version, None);
        assert_eq!(status.hash, PENDING);
    }

    #[tokio::test]
    async fn test_get_unknown_transaction() {
        let client = node().await;
        let hash = format!("0x{}", "9".repeat(64));

        let result = client.get_transaction(&hash).await;

        assert!(matches!(result, Err(ChainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_node_error_carries_message() {
        let client = node().await;

        let result = client.get_transaction(BROKEN).await;

        match result {
            Err(ChainError::Node { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "storage unavailable (internal_error)");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
