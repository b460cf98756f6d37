//! Retry loop: run a closure until success or policy says stop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::classify;
use super::error::FetchError;
use super::policy::{RetryDecision, RetryPolicy};

/// Blocks the caller for a backoff delay. Injected so tests can simulate time.
pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Records requested delays instead of sleeping. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, delay: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(delay);
    }
}

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. On a retryable failure the
/// sleeper is asked to wait for the backoff delay before the next attempt;
/// the last error is returned once retries are exhausted.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &mut dyn Sleeper,
    mut f: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying after {}", e);
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
        }
    }

    #[test]
    fn throttled_three_times_then_ok() {
        let mut sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let out = run_with_retry(&policy(), &mut sleeper, |_| {
            calls += 1;
            if calls <= 3 {
                Err(FetchError::Http(429))
            } else {
                Ok("body")
            }
        });
        assert_eq!(out.unwrap(), "body");
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(20)
            ]
        );
    }

    #[test]
    fn exhausted_retries_return_last_error() {
        let mut sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&policy(), &mut sleeper, |_| {
            calls += 1;
            Err(FetchError::Http(429))
        });
        assert!(matches!(out, Err(FetchError::Http(429))));
        assert_eq!(calls, 4);
        assert_eq!(sleeper.delays().len(), 3);
    }

    #[test]
    fn permanent_status_not_retried() {
        let mut sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&policy(), &mut sleeper, |_| {
            calls += 1;
            Err(FetchError::Http(404))
        });
        assert!(matches!(out, Err(FetchError::Http(404))));
        assert_eq!(calls, 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn network_errors_use_same_schedule() {
        let mut sleeper = RecordingSleeper::default();
        let out = run_with_retry(&policy(), &mut sleeper, |attempt| {
            if attempt < 3 {
                Err(FetchError::Curl(curl::Error::new(7)))
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(out.unwrap(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(5), Duration::from_secs(10)]
        );
    }
}
