//! The retry engine.
//!
//! [`run`] calls an async operation until it succeeds, fails fatally, runs out
//! of retries, or its [`RunContext`] is cancelled. The operation classifies its
//! own errors:
//!
//! - **Retryable**: wrap the error with [`retry_err`] or [`Failure::retryable`]
//! - **Fatal**: return [`Failure::Fatal`]; the run stops immediately
//!
//! # Quick Start
//!
//! ```rust
//! use tenacious::{run, Failure, RetryLimit, RunContext, RunError};
//! use tenacious::delay::{exponential, DelayExt};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let ctx = RunContext::new().with_timeout(Duration::from_secs(30));
//!
//! let result: Result<u32, RunError<&str>> = run(
//!     Some(&ctx),
//!     RetryLimit::retries(3),
//!     exponential(Duration::from_secs(1)).jitter(),
//!     |_ctx| async { Ok(42) },
//! )
//! .await;
//!
//! assert_eq!(result, Ok(42));
//! # });
//! ```
//!
//! # Budgets
//!
//! A [`RetryLimit`] of `n` allows `n` retries after the first attempt.
//! [`RetryLimit::RETRY_ONCE`] makes a single attempt and
//! [`RetryLimit::RETRY_FOREVER`] never gives up on retryable errors.
//!
//! # Error Types
//!
//! - [`RunError::Failed`]: the fatal error, or the last retryable error once
//!   the budget is spent, with the retryable tag removed
//! - [`RunError::TooManyRetries`]: the budget was spent with nothing recorded
//! - [`RunError::Cancelled`]: the context finished during a wait

mod config;
mod context;
mod engine;
mod error;
mod limit;

pub use config::RetryConfig;
pub use context::{CancelReason, RunContext};
pub use engine::{run, run_with_hooks, RetryEvent};
pub use error::{retry_err, Failure, FailureExt, RetryableError, RunError};
pub use limit::RetryLimit;
