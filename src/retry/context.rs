//! Cancellation context passed through a retry run.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`RunContext`] finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// [`RunContext::cancel`] was called on this context or a parent.
    Cancelled,
    /// The context's deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "context canceled"),
            Self::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

impl Error for CancelReason {}

/// A cancellation signal with an optional deadline.
///
/// The retry engine races every inter-attempt wait against [`done`](Self::done)
/// and hands a clone of the context to each attempt, so operations can observe
/// cancellation themselves. Clones share the same cancellation state.
///
/// # Examples
///
/// ```rust
/// use tenacious::{CancelReason, RunContext};
///
/// # tokio_test::block_on(async {
/// let ctx = RunContext::new();
/// let child = ctx.child();
/// assert!(!child.is_done());
///
/// ctx.cancel();
/// assert_eq!(child.done().await, CancelReason::Cancelled);
/// assert_eq!(child.reason(), Some(CancelReason::Cancelled));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RunContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RunContext {
    /// A context nothing else holds, so it only ends if cancelled directly.
    ///
    /// This is what the engine substitutes when no context is given.
    pub fn background() -> Self {
        Self::new()
    }

    /// A fresh cancellable context.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A child that is cancelled along with this context, and can be
    /// cancelled on its own without affecting the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// A child that also finishes once `deadline` passes.
    ///
    /// An earlier deadline inherited from this context still applies.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// A child that also finishes after `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Why the context finished, or `None` while it is still live.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            Some(CancelReason::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(CancelReason::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Returns true once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.reason().is_some()
    }

    /// Wait until the context finishes.
    ///
    /// Explicit cancellation wins if it and the deadline are both ready.
    pub async fn done(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => CancelReason::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelReason::Cancelled
            }
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CancellationToken> for RunContext {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}
