//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::chain::ChainError;

#[derive(Debug)]
pub enum ApiError {
    /// No chain client is configured.
    ChainUnavailable,
    Chain(ChainError),
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::Chain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::ChainUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "chain client not configured".to_string(),
            ),
            ApiError::Chain(err @ ChainError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Chain(err @ ChainError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Chain(err) => {
                tracing::error!(error = %err, "Chain request failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
