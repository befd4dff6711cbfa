// Path: crates/cli/src/providers/http.rs
//! Request retries shared by the network providers.

use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::{RequestBuilder, StatusCode};
use tokio::time::{sleep, Duration};

pub(crate) const HTTP_RETRIES: u32 = 4;
const BASE_BACKOFF_MS: u64 = 250;
const MAX_BACKOFF_MS: u64 = 4_000;

/// Which failures a request may be retried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// 429, 5xx and send errors. For reads.
    Transient,
    /// Only 429: the server refused the request before acting on it.
    RateLimit,
}

/// A completed HTTP exchange.
#[derive(Debug)]
pub struct Reply {
    /// The response status.
    pub status: StatusCode,
    /// The response body.
    pub body: Vec<u8>,
}

impl Reply {
    /// The body, shortened for error messages.
    pub fn snippet(&self) -> String {
        snippet(&self.body)
    }
}

pub(crate) fn snippet(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    let short: String = text.chars().take(200).collect();
    short.replace('\n', "\\n").replace('\r', "\\r")
}

pub(crate) fn retry_delay(attempt: u32, retry_after: Option<&HeaderValue>) -> Duration {
    if let Some(secs) = retry_after
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
    {
        return Duration::from_secs(secs.min(MAX_BACKOFF_MS / 1000));
    }
    let ms = BASE_BACKOFF_MS
        .saturating_mul(1u64 << attempt.min(16))
        .min(MAX_BACKOFF_MS);
    Duration::from_millis(ms)
}

fn retryable(status: StatusCode, policy: RetryOn) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (policy == RetryOn::Transient && status.is_server_error())
}

/// Sends the request built by `build`, retrying per `policy`.
///
/// Returns the last reply when retries run out on a retryable status, so the
/// caller decides how to report it.
pub async fn send<F>(what: &str, policy: RetryOn, build: F) -> Result<Reply, String>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let response = match build().send().await {
            Ok(r) => r,
            Err(e) if policy == RetryOn::Transient && attempt < HTTP_RETRIES => {
                tracing::debug!(target: "provider", what, attempt, error = %e, "send failed, retrying");
                sleep(retry_delay(attempt, None)).await;
                attempt += 1;
                continue;
            }
            Err(e) => return Err(format!("{}: {}", what, e)),
        };

        let status = response.status();
        let retry_after = response.headers().get(RETRY_AFTER).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| format!("{}: reading body: {}", what, e))?
            .to_vec();

        if retryable(status, policy) && attempt < HTTP_RETRIES {
            let delay = retry_delay(attempt, retry_after.as_ref());
            tracing::debug!(
                target: "provider",
                what,
                status = status.as_u16(),
                ?delay,
                body = %snippet(&body),
                "retryable status, backing off"
            );
            sleep(delay).await;
            attempt += 1;
            continue;
        }
        return Ok(Reply { status, body });
    }
}
