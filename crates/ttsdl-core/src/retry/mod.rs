//! Retry and backoff policy.
//!
//! Classifies fetch failures (throttling, connection failures, timeouts) and
//! makes exponential backoff decisions. The delay itself goes through a
//! [`Sleeper`] so callers can substitute simulated time.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RecordingSleeper, Sleeper, ThreadSleeper};
