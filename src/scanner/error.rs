//! Scanner error types.

/// Scanner construction error. Scans themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
