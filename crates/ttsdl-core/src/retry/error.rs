//! Fetch error type for retry classification.

use thiserror::Error;

/// Error returned by a single fetch attempt (curl failure or HTTP status).
/// Kept separate from anyhow so retries can be decided on the variant.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Final response had a status other than 200.
    #[error("HTTP {0}")]
    Http(u32),
}
