//! Retry configuration as plain data.

use std::future::Future;

use super::context::RunContext;
use super::engine::run;
use super::error::{Failure, RunError};
use super::limit::RetryLimit;
use crate::delay::DelayConfig;

/// A retry budget paired with a delay strategy description.
///
/// Like [`DelayConfig`], this is pure data. [`run`](RetryConfig::run) builds a
/// fresh strategy for every run, so one config can drive many runs, including
/// concurrent ones, even with a stateful Fibonacci backoff.
///
/// # Examples
///
/// ```rust
/// use tenacious::{Failure, RetryConfig, RetryLimit};
/// use tenacious::delay::Backoff;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let config = RetryConfig::new(RetryLimit::retries(3))
///     .with_delay(Backoff::Constant { delay: Duration::from_millis(1) });
///
/// let result = config
///     .run(None, |_ctx| async { Err::<(), _>(Failure::retryable("down")) })
///     .await;
///
/// assert_eq!(result.unwrap_err().into_inner(), Some("down"));
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryConfig {
    /// How many retries to allow.
    pub limit: RetryLimit,
    /// How long to wait between attempts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay: DelayConfig,
}

impl RetryConfig {
    /// Retry up to `limit` times without waiting.
    pub fn new(limit: RetryLimit) -> Self {
        Self {
            limit,
            delay: DelayConfig::default(),
        }
    }

    /// Set the delay strategy.
    pub fn with_delay(mut self, delay: impl Into<DelayConfig>) -> Self {
        self.delay = delay.into();
        self
    }

    /// Run `operation` under this configuration.
    ///
    /// See [`run`](crate::run) for the semantics.
    pub async fn run<T, E, F, Fut>(
        &self,
        ctx: Option<&RunContext>,
        operation: F,
    ) -> Result<T, RunError<E>>
    where
        F: FnMut(RunContext) -> Fut,
        Fut: Future<Output = Result<T, Failure<E>>>,
    {
        run(ctx, self.limit, self.delay.build(), operation).await
    }
}
