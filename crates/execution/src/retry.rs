// Path: crates/execution/src/retry.rs
//! Fixed-backoff retries for submissions that may fail transiently.

use gauntlet_types::error::SubmissionError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Default number of attempts, including the first.
pub const DEFAULT_MAX_RETRY: u32 = 5;
/// The pause between attempts.
pub const FIXED_BACKOFF: Duration = Duration::from_secs(1);

/// How often, and how far apart, a submission is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts; `0` is treated as `1`.
    pub max_attempts: u32,
    /// The pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY,
            backoff: FIXED_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// The default backoff with `max_attempts` attempts.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Runs `op` until it succeeds or the attempts are used up.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, SubmissionError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, SubmissionError>>,
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max => {
                    tracing::error!(target: "upload", what, attempt, error = %e, "giving up");
                    return Err(SubmissionError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(target: "upload", what, attempt, max, error = %e, "attempt failed, retrying");
                    sleep(self.backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let value = RetryPolicy::default()
            .run("ocr2", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(SubmissionError::Transport("connection reset".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_attempts_is_fatal() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::with_max_attempts(2)
            .run("flags", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(SubmissionError::Rejected("out of gas".into())) }
            })
            .await
            .unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match err {
            SubmissionError::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("out of gas"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let _ = RetryPolicy::with_max_attempts(0)
            .run("proxy_ocr2", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(SubmissionError::Transport("down".into())) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
