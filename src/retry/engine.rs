//! The retry loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::context::RunContext;
use super::error::{Failure, RetryableError, RunError};
use super::limit::RetryLimit;
use crate::delay::Delay;

/// Information about a failed attempt that is about to be retried.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt.
    pub next_delay: Duration,
    /// Total elapsed time since the first attempt started.
    pub elapsed: Duration,
}

/// Run `operation`, retrying it while it fails with a retryable error.
///
/// The operation receives a clone of the context for every attempt. Its result
/// decides what happens next:
///
/// - `Ok(value)` ends the run with `Ok(value)`.
/// - `Err(Failure::Fatal(e))` ends the run with `RunError::Failed(e)`, whatever
///   budget is left.
/// - `Err(Failure::Retryable(e))` schedules another attempt if `limit` allows
///   one. Otherwise the run ends with `RunError::Failed(e)`, the retryable tag
///   stripped.
///
/// Before attempt `n` (counting from 0, so never before the first), the
/// engine asks `delay` for the wait with iteration `n` and sleeps for it. If
/// the context finishes first the run ends with `RunError::Cancelled`, even if
/// a retryable error is pending. The context is not checked while an attempt
/// is in flight.
///
/// A `None` context is replaced with [`RunContext::background`].
///
/// # Examples
///
/// ```rust
/// use tenacious::{run, Failure, RetryLimit};
/// use tenacious::delay::linear;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let attempts = AtomicU32::new(0);
///
/// let result = run(
///     None,
///     RetryLimit::retries(5),
///     linear(Duration::from_millis(1)),
///     |_ctx| {
///         let n = attempts.fetch_add(1, Ordering::SeqCst);
///         async move {
///             if n < 2 {
///                 Err(Failure::retryable("transient failure"))
///             } else {
///                 Ok("success")
///             }
///         }
///     },
/// )
/// .await;
///
/// assert_eq!(result, Ok("success"));
/// assert_eq!(attempts.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn run<T, E, D, F, Fut>(
    ctx: Option<&RunContext>,
    limit: RetryLimit,
    delay: D,
    operation: F,
) -> Result<T, RunError<E>>
where
    D: Delay,
    F: FnMut(RunContext) -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
{
    run_with_hooks(ctx, limit, delay, operation, |_: &RetryEvent<'_, E>| {}).await
}

/// [`run`] with a hook called before each retry.
///
/// `on_retry` fires once per retry, after the delay for the next attempt is
/// known and before the wait starts. It is not called for the final failure of
/// an exhausted run, nor for fatal errors. Keep it cheap; it runs inline.
///
/// # Examples
///
/// ```rust
/// use tenacious::{run_with_hooks, Failure, RetryEvent, RetryLimit};
/// use tenacious::delay::constant;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let mut seen = Vec::new();
///
/// let result = run_with_hooks(
///     None,
///     RetryLimit::retries(2),
///     constant(Duration::from_millis(1)),
///     |_ctx| async { Err::<(), _>(Failure::retryable("busy")) },
///     |event: &RetryEvent<'_, &str>| seen.push((event.attempt, *event.error)),
/// )
/// .await;
///
/// assert!(result.is_err());
/// assert_eq!(seen, vec![(1, "busy"), (2, "busy")]);
/// # });
/// ```
pub async fn run_with_hooks<T, E, D, F, Fut, H>(
    ctx: Option<&RunContext>,
    limit: RetryLimit,
    mut delay: D,
    mut operation: F,
    mut on_retry: H,
) -> Result<T, RunError<E>>
where
    D: Delay,
    F: FnMut(RunContext) -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    H: FnMut(&RetryEvent<'_, E>),
{
    let ctx = ctx.cloned().unwrap_or_else(RunContext::background);
    let start = Instant::now();
    let mut last_error: Option<RetryableError<E>> = None;
    let mut iteration: u32 = 0;

    while limit.permits(iteration) {
        if iteration > 0 {
            let sleep = delay.delay(iteration);

            if let Some(error) = &last_error {
                on_retry(&RetryEvent {
                    attempt: iteration,
                    error: error.get_ref(),
                    next_delay: sleep,
                    elapsed: start.elapsed(),
                });
            }

            #[cfg(feature = "tracing")]
            tracing::debug!("Attempt {} failed, retrying in {:?}", iteration, sleep);

            tokio::select! {
                biased;
                reason = ctx.done() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Retry run cancelled after {} attempts: {}", iteration, reason);
                    return Err(RunError::Cancelled(reason));
                }
                _ = tokio::time::sleep(sleep) => {}
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Starting attempt {}", iteration + 1);

        match operation(ctx.clone()).await {
            Ok(value) => return Ok(value),
            Err(Failure::Fatal(error)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Attempt {} failed with a fatal error", iteration + 1);
                return Err(RunError::Failed(error));
            }
            Err(Failure::Retryable(error)) => last_error = Some(error),
        }

        iteration = iteration.saturating_add(1);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Retry limit reached after {} attempts ({})", iteration, limit);

    match last_error {
        Some(error) => Err(RunError::Failed(error.into_inner())),
        None => Err(RunError::TooManyRetries),
    }
}
