//! Retry logic for S3 listing calls.
//!
//! Transient failures (throttling, 5xx, timeouts, dropped connections) are
//! retried a bounded number of times with capped exponential backoff. Every
//! other failure is returned on the first attempt.

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Whether to add up to 25% jitter to backoff times.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that never retries.
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff in milliseconds.
    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Set the maximum backoff in milliseconds.
    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Backoff before retry number `attempt + 1`.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let capped_ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);

        let final_ms = if self.jitter && capped_ms >= 4 {
            let jitter = rand::rng().random_range(0..=capped_ms / 4);
            capped_ms.saturating_add(jitter)
        } else {
            capped_ms
        };

        Duration::from_millis(final_ms)
    }
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// The error is transient and can be retried.
    Retryable,
    /// The error is permanent and should not be retried.
    NonRetryable,
}

const PERMANENT_MARKERS: &[&str] = &[
    "nosuchbucket",
    "accessdenied",
    "allaccessdisabled",
    "invalidaccesskeyid",
    "signaturedoesnotmatch",
    "expiredtoken",
    "invalidtoken",
    "invalidbucketname",
    "invalidargument",
    "permanentredirect",
    "authorizationheadermalformed",
    "status: 400",
    "status: 401",
    "status: 403",
    "status: 404",
];

const TRANSIENT_MARKERS: &[&str] = &[
    "slowdown",
    "throttl",
    "toomanyrequests",
    "requesttimeout",
    "internalerror",
    "serviceunavailable",
    "service unavailable",
    "timeout",
    "timed out",
    "dispatch failure",
    "connection reset",
    "connection refused",
    "status: 500",
    "status: 502",
    "status: 503",
    "status: 504",
];

/// Classify a listing error message for retry purposes.
///
/// Permanent markers win over transient ones, so an `AccessDenied` that
/// mentions a timeout is still not retried. Unknown errors are retried.
pub fn classify_error(error: &str) -> ErrorClassification {
    let error_lower = error.to_lowercase();

    if PERMANENT_MARKERS.iter().any(|m| error_lower.contains(m)) {
        return ErrorClassification::NonRetryable;
    }

    if TRANSIENT_MARKERS.iter().any(|m| error_lower.contains(m)) {
        return ErrorClassification::Retryable;
    }

    ErrorClassification::Retryable
}

/// Execute an async operation with bounded retries.
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `operation_name` - Name of the operation for logging
/// * `operation` - Produces a fresh attempt each time it is called
///
/// # Returns
///
/// The first success, or the last error once retries are exhausted or a
/// non-retryable error is seen.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;

    loop {
        let e = match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        if classify_error(&e.to_string()) == ErrorClassification::NonRetryable {
            warn!(
                operation = operation_name,
                attempt,
                error = %e,
                "Non-retryable error"
            );
            return Err(e);
        }

        if attempt >= config.max_retries {
            warn!(
                operation = operation_name,
                attempt,
                error = %e,
                "Retries exhausted"
            );
            return Err(e);
        }

        let backoff = config.backoff_duration(attempt);
        warn!(
            operation = operation_name,
            attempt,
            error = %e,
            backoff_ms = backoff.as_millis() as u64,
            "Retryable error, backing off"
        );
        sleep(backoff).await;
        attempt += 1;
    }
}
