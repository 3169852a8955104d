//! # Tenacious
//!
//! > *"If at first you don't succeed, wait a bit and try again"*
//!
//! A Rust library for retrying fallible, cancellable async operations.
//!
//! ## Philosophy
//!
//! **Tenacious** keeps the two halves of a retry loop apart:
//! - **Delays** = Pure-ish functions from attempt number to wait time, composed
//!   from backoff strategies and decorators (see [`delay`])
//! - **The loop** = A small state machine that runs the operation, classifies
//!   its errors, waits, and honors cancellation (see [`run`])
//!
//! ## Quick Example
//!
//! ```rust
//! use tenacious::{run, Failure, RetryLimit, RunContext, RunError};
//! use tenacious::delay::{fibonacci, DelayExt};
//! use std::time::Duration;
//!
//! #[derive(Debug, PartialEq)]
//! enum FetchError {
//!     Unavailable,
//!     NotFound,
//! }
//!
//! async fn fetch(attempt: u32) -> Result<&'static str, FetchError> {
//!     if attempt < 2 { Err(FetchError::Unavailable) } else { Ok("payload") }
//! }
//!
//! # tokio_test::block_on(async {
//! let ctx = RunContext::new().with_timeout(Duration::from_secs(10));
//! let mut attempt = 0;
//!
//! let result = run(
//!     Some(&ctx),
//!     RetryLimit::retries(5),
//!     fibonacci(Duration::from_millis(1)).jitter(),
//!     |_ctx| {
//!         attempt += 1;
//!         let this_attempt = attempt;
//!         async move {
//!             fetch(this_attempt).await.map_err(|e| match e {
//!                 FetchError::Unavailable => Failure::retryable(e),
//!                 FetchError::NotFound => Failure::fatal(e),
//!             })
//!         }
//!     },
//! )
//! .await;
//!
//! assert_eq!(result, Ok("payload"));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events from the retry loop
//! - `serde`: (de)serialize [`RetryConfig`] and friends
//! - `proptest`: `Arbitrary` implementations in [`testing`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod delay;
pub mod retry;
pub mod testing;

// Re-exports
pub use delay::{Delay, DelayExt};
pub use retry::{
    retry_err, run, run_with_hooks, CancelReason, Failure, FailureExt, RetryConfig, RetryEvent,
    RetryLimit, RetryableError, RunContext, RunError,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::delay::{
        constant, exponential, fibonacci, linear, no_delay, Delay, DelayExt, Log, Rand,
    };
    pub use crate::retry::{
        retry_err, run, run_with_hooks, Failure, FailureExt, RetryConfig, RetryLimit, RunContext,
        RunError,
    };
}
