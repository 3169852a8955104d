//! Error types for retry operations.

use std::error::Error;
use std::fmt;

use super::context::CancelReason;

/// An error the operation considers transient.
///
/// Wrapping an error in `RetryableError` tells the engine the attempt may be
/// retried. The wrapper is invisible from the outside: `Display` and `Debug`
/// print the inner error, and the engine strips it before handing the error
/// back.
///
/// # Examples
///
/// ```rust
/// use tenacious::retry_err;
///
/// let err = retry_err("connection reset");
/// assert_eq!(err.to_string(), "connection reset");
/// assert_eq!(err.into_inner(), "connection reset");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RetryableError<E> {
    error: E,
}

impl<E> RetryableError<E> {
    /// Mark `error` as retryable.
    pub fn new(error: E) -> Self {
        Self { error }
    }

    /// Get a reference to the wrapped error.
    pub fn get_ref(&self) -> &E {
        &self.error
    }

    /// Strip the retryable tag.
    pub fn into_inner(self) -> E {
        self.error
    }
}

/// Shorthand for [`RetryableError::new`].
pub fn retry_err<E>(error: E) -> RetryableError<E> {
    RetryableError::new(error)
}

impl<E: fmt::Debug> fmt::Debug for RetryableError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<E: fmt::Display> fmt::Display for RetryableError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<E: Error> Error for RetryableError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

/// How an attempt failed.
///
/// Operations return `Result<T, Failure<E>>`. A [`Retryable`](Failure::Retryable)
/// failure lets the engine try again while the budget lasts; a
/// [`Fatal`](Failure::Fatal) one ends the run at once.
///
/// # Examples
///
/// ```rust
/// use tenacious::{retry_err, Failure};
///
/// let transient: Failure<&str> = retry_err("timeout").into();
/// assert!(transient.is_retryable());
///
/// let permanent = Failure::fatal("bad request");
/// assert!(!permanent.is_retryable());
/// assert_eq!(permanent.into_inner(), "bad request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure<E> {
    /// Worth another attempt.
    Retryable(RetryableError<E>),
    /// Not worth another attempt.
    Fatal(E),
}

impl<E> Failure<E> {
    /// A retryable failure.
    pub fn retryable(error: E) -> Self {
        Self::Retryable(RetryableError::new(error))
    }

    /// A fatal failure.
    pub fn fatal(error: E) -> Self {
        Self::Fatal(error)
    }

    /// Returns true if the engine may retry after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    /// Get a reference to the underlying error.
    pub fn error(&self) -> &E {
        match self {
            Self::Retryable(e) => e.get_ref(),
            Self::Fatal(e) => e,
        }
    }

    /// Extract the underlying error, dropping the classification.
    pub fn into_inner(self) -> E {
        match self {
            Self::Retryable(e) => e.into_inner(),
            Self::Fatal(e) => e,
        }
    }
}

impl<E> From<RetryableError<E>> for Failure<E> {
    fn from(error: RetryableError<E>) -> Self {
        Self::Retryable(error)
    }
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error().fmt(f)
    }
}

impl<E: Error + 'static> Error for Failure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error().source()
    }
}

/// Classify the error side of a `Result`.
///
/// # Examples
///
/// ```rust
/// use tenacious::{Failure, FailureExt};
///
/// let parsed: Result<u16, Failure<_>> = "80".parse::<u16>().fatal();
/// assert_eq!(parsed, Ok(80));
///
/// let failed = "port".parse::<u16>().retryable();
/// assert!(failed.unwrap_err().is_retryable());
/// ```
pub trait FailureExt<T, E> {
    /// Mark any error as retryable.
    fn retryable(self) -> Result<T, Failure<E>>;

    /// Mark any error as fatal.
    fn fatal(self) -> Result<T, Failure<E>>;
}

impl<T, E> FailureExt<T, E> for Result<T, E> {
    fn retryable(self) -> Result<T, Failure<E>> {
        self.map_err(Failure::retryable)
    }

    fn fatal(self) -> Result<T, Failure<E>> {
        self.map_err(Failure::Fatal)
    }
}

/// Why a retry run ended without success.
///
/// # Examples
///
/// ```rust
/// use tenacious::{run, Failure, RetryLimit, RunError};
/// use tenacious::delay::no_delay;
///
/// # tokio_test::block_on(async {
/// let result = run(None, RetryLimit::retries(2), no_delay(), |_ctx| async {
///     Err::<(), _>(Failure::retryable("always fails"))
/// })
/// .await;
///
/// // The retryable tag is gone; the original error comes back
/// assert_eq!(result, Err(RunError::Failed("always fails")));
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError<E> {
    /// The operation failed fatally, or the budget ran out and this was the
    /// last retryable error.
    Failed(E),
    /// The budget ran out without any error being recorded.
    TooManyRetries,
    /// The context was cancelled or its deadline passed while waiting.
    Cancelled(CancelReason),
}

impl<E> RunError<E> {
    /// Returns true for the retry-limit sentinel.
    pub fn is_too_many_retries(&self) -> bool {
        matches!(self, Self::TooManyRetries)
    }

    /// Returns true if the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// The operation's error, if the run ended with one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Failed(e) => Some(e),
            Self::TooManyRetries | Self::Cancelled(_) => None,
        }
    }

    /// The cancellation reason, if the run was cancelled.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Self::Cancelled(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RunError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(e) => e.fmt(f),
            Self::TooManyRetries => write!(f, "exceeded retry limit"),
            Self::Cancelled(reason) => reason.fmt(f),
        }
    }
}

impl<E: Error + 'static> Error for RunError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Failed(e) => Some(e),
            Self::TooManyRetries => None,
            Self::Cancelled(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;
    use std::io;

    #[test]
    fn test_retryable_display_passes_through() {
        let inner = io::Error::new(io::ErrorKind::ConnectionReset, "peer reset");
        let expected = inner.to_string();
        assert_eq!(retry_err(inner).to_string(), expected);
    }

    #[test]
    fn test_retryable_debug_passes_through() {
        assert_eq!(format!("{:?}", retry_err("x")), format!("{:?}", "x"));
    }

    #[test]
    fn test_retryable_round_trip() {
        let err = retry_err(String::from("boom"));
        assert_eq!(err.get_ref(), "boom");
        assert_eq!(err.into_inner(), "boom");
    }

    #[test]
    fn test_failure_classification() {
        let retryable: Failure<i32> = retry_err(1).into();
        assert!(retryable.is_retryable());
        assert_eq!(retryable.error(), &1);

        let fatal = Failure::fatal(2);
        assert!(!fatal.is_retryable());
        assert_eq!(fatal.into_inner(), 2);
    }

    #[test]
    fn test_failure_ext() {
        let ok: Result<i32, &str> = Ok(1);
        assert_eq!(ok.retryable(), Ok(1));

        let err: Result<i32, &str> = Err("nope");
        assert_eq!(err.retryable(), Err(Failure::retryable("nope")));
        assert_eq!(err.fatal(), Err(Failure::Fatal("nope")));
    }

    #[test]
    fn test_run_error_display() {
        assert_eq!(
            RunError::<String>::TooManyRetries.to_string(),
            "exceeded retry limit"
        );
        assert_eq!(RunError::Failed("disk full").to_string(), "disk full");
        assert_eq!(
            RunError::<&str>::Cancelled(CancelReason::Cancelled).to_string(),
            "context canceled"
        );
        assert_eq!(
            RunError::<&str>::Cancelled(CancelReason::DeadlineExceeded).to_string(),
            "context deadline exceeded"
        );
    }

    #[test]
    fn test_run_error_accessors() {
        let sentinel = RunError::<&str>::TooManyRetries;
        assert!(sentinel.is_too_many_retries());
        assert_eq!(sentinel, RunError::TooManyRetries);
        assert_eq!(sentinel.into_inner(), None);

        let cancelled = RunError::<&str>::Cancelled(CancelReason::Cancelled);
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.cancel_reason(), Some(CancelReason::Cancelled));

        assert_eq!(RunError::Failed(7).into_inner(), Some(7));
    }

    #[test]
    fn test_run_error_source() {
        let err = RunError::Failed(io::Error::other("inner"));
        assert_eq!(err.source().unwrap().to_string(), "inner");
        assert!(RunError::<io::Error>::TooManyRetries.source().is_none());
    }
}
