//! Retry with exponential backoff for ledger RPC calls.
//!
//! Object resolution and coin lookups talk to a remote node and can fail
//! transiently. Those calls go through a [`RetryExecutor`]; everything that
//! is a property of the request itself (bad arguments, missing objects,
//! execution aborts) fails immediately.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use sui_sponsor_sdk::retry::RetryConfig;
//!
//! let config = RetryConfig::builder()
//!     .max_retries(5)
//!     .initial_delay_ms(100)
//!     .max_delay_ms(10_000)
//!     .jitter(0.0)
//!     .build();
//! assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
//! ```

use crate::error::{SponsorError, SponsorResult};
use std::future::Future;
use std::time::Duration;

/// Backoff settings.
///
/// Retry `n` (1-based) waits `initial_delay_ms * backoff^(n-1)`, capped at
/// `max_delay_ms`, then spread by `±jitter` of itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero fails fast.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay_ms: u64,
    /// Cap on any single delay.
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays.
    pub backoff: f64,
    /// Spread as a fraction of the delay, in `0.0..=1.0`. Zero disables it.
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 10_000,
            backoff: 2.0,
            jitter: 0.5,
        }
    }
}

impl RetryConfig {
    /// Starts a builder from the default settings.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Many quick retries, for a node on the same machine.
    pub fn aggressive() -> Self {
        Self {
            max_retries: 5,
            initial_delay_ms: 50,
            max_delay_ms: 5_000,
            backoff: 1.5,
            jitter: 0.3,
        }
    }

    /// Few slow retries, for rate-limited public fullnodes.
    pub fn conservative() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt`. Attempt zero is the first try.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let Some(exponent) = attempt.checked_sub(1) else {
            return Duration::ZERO;
        };
        let grown = self.initial_delay_ms as f64 * self.backoff.powi(exponent.min(64) as i32);
        let mut millis = grown.min(self.max_delay_ms as f64);
        if self.jitter > 0.0 {
            // Uniform in [1 - jitter, 1 + jitter)
            let spread = 1.0 + self.jitter * (2.0 * rand::random::<f64>() - 1.0);
            millis *= spread;
        }
        Duration::from_millis(millis.max(0.0) as u64)
    }

    /// Whether `error` is transient under this policy.
    ///
    /// Request timeouts (408) count as transient on top of the statuses
    /// [`SponsorError::is_retryable`] already accepts.
    pub fn is_retryable_error(&self, error: &SponsorError) -> bool {
        error.is_retryable()
            || matches!(
                error,
                SponsorError::Api {
                    status_code: 408,
                    ..
                }
            )
    }
}

/// Builder for [`RetryConfig`], starting from the default settings.
#[derive(Debug, Clone, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    /// See [`RetryConfig::max_retries`].
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// See [`RetryConfig::initial_delay_ms`].
    #[must_use]
    pub fn initial_delay_ms(mut self, millis: u64) -> Self {
        self.config.initial_delay_ms = millis;
        self
    }

    /// See [`RetryConfig::max_delay_ms`].
    #[must_use]
    pub fn max_delay_ms(mut self, millis: u64) -> Self {
        self.config.max_delay_ms = millis;
        self
    }

    /// See [`RetryConfig::backoff`].
    #[must_use]
    pub fn backoff(mut self, factor: f64) -> Self {
        self.config.backoff = factor;
        self
    }

    /// Clamped to `0.0..=1.0`.
    #[must_use]
    pub fn jitter(mut self, fraction: f64) -> Self {
        self.config.jitter = fraction.clamp(0.0, 1.0);
        self
    }

    /// Finishes the config.
    pub fn build(self) -> RetryConfig {
        self.config
    }
}

/// Runs async operations under a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Creates an executor.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// The policy in use.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation` until it succeeds, fails permanently, or retries run out.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> SponsorResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SponsorResult<T>>,
    {
        self.execute_with_predicate(operation, |e| self.config.is_retryable_error(e))
            .await
    }

    /// Like [`execute`](Self::execute) with a caller-supplied retry predicate.
    pub async fn execute_with_predicate<F, Fut, T, P>(
        &self,
        operation: F,
        should_retry: P,
    ) -> SponsorResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SponsorResult<T>>,
        P: Fn(&SponsorError) -> bool,
    {
        let mut failures = 0u32;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            failures += 1;
            if failures > self.config.max_retries || !should_retry(&error) {
                return Err(error);
            }
            let delay = self.config.delay_for_attempt(failures);
            tracing::debug!(
                attempt = failures,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error.sanitized_message(),
                "retrying ledger call"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
