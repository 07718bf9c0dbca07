//! Aptos chain access: account balances and transaction status.
//!
//! Thin pass-through to a fullnode. Signing and submission are out of scope.

mod rest;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use rest::AptosRestClient;

/// Chain errors.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Malformed account address or transaction hash.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The account, resource, or transaction does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Error response from the fullnode.
    #[error("node error {code}: {message}")]
    Node { code: u16, message: String },

    /// Unexpected response body.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Coin balance of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub address: String,
    pub coin_type: String,
    /// Balance in the coin's smallest unit (octas for APT).
    pub balance: u64,
}

/// Execution state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Pending,
    Success,
    Failed,
}

/// Status of a transaction looked up by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub hash: String,
    pub state: TransactionState,
    /// Ledger version, absent while pending.
    pub version: Option<u64>,
    pub vm_status: Option<String>,
}

/// ChainClient is the blockchain collaborator behind the account and transaction endpoints.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Returns the configured coin balance of `address`.
    async fn get_balance(&self, address: &str) -> Result<AccountBalance>;

    /// Looks up a transaction by hash.
    async fn get_transaction(&self, hash: &str) -> Result<TransactionStatus>;
}

/// Checks an account address: `0x` followed by 1 to 64 hex digits.
pub fn validate_address(address: &str) -> Result<()> {
    validate_hex(address, 1..=64, "account address")
}

/// Checks a transaction hash: `0x` followed by exactly 64 hex digits.
pub fn validate_hash(hash: &str) -> Result<()> {
    validate_hex(hash, 64..=64, "transaction hash")
}

fn validate_hex(value: &str, digits: std::ops::RangeInclusive<usize>, what: &str) -> Result<()> {
    let hex = value
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::InvalidInput(format!("{} must start with 0x: {}", what, value)))?;

    if !digits.contains(&hex.len()) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidInput(format!("malformed {}: {}", what, value)));
    }

    Ok(())
}
