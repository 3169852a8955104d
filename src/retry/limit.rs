//! Retry budgets.

use std::fmt;

/// The maximum number of retries after the first attempt.
///
/// - `n >= 0`: up to `n` retries, so at most `n + 1` attempts
/// - `n < 0`: retry without limit
///
/// # Examples
///
/// ```rust
/// use tenacious::RetryLimit;
///
/// assert_eq!(RetryLimit::retries(3).max_attempts(), Some(4));
/// assert_eq!(RetryLimit::RETRY_ONCE.max_attempts(), Some(1));
/// assert_eq!(RetryLimit::RETRY_FOREVER.max_attempts(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RetryLimit(i64);

impl RetryLimit {
    /// A single attempt with no retries.
    ///
    /// The name counts the run itself as the one try.
    pub const RETRY_ONCE: Self = Self(0);

    /// Retry until success, a fatal error or cancellation.
    pub const RETRY_FOREVER: Self = Self(-1);

    /// Build a limit from a raw value; negative means unlimited.
    pub const fn new(limit: i64) -> Self {
        Self(limit)
    }

    /// Allow exactly `n` retries.
    pub const fn retries(n: u32) -> Self {
        Self(n as i64)
    }

    /// The raw value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether the limit is unbounded.
    pub const fn is_unlimited(self) -> bool {
        self.0 < 0
    }

    /// Total attempts allowed, counting the first; `None` when unlimited.
    pub fn max_attempts(self) -> Option<u64> {
        u64::try_from(self.0).ok().map(|n| n.saturating_add(1))
    }

    /// Whether the zero-based `iteration` may run under this limit.
    pub fn permits(self, iteration: u32) -> bool {
        self.is_unlimited() || i64::from(iteration) <= self.0
    }
}

impl Default for RetryLimit {
    fn default() -> Self {
        Self::RETRY_ONCE
    }
}

impl From<i64> for RetryLimit {
    fn from(limit: i64) -> Self {
        Self::new(limit)
    }
}

impl From<u32> for RetryLimit {
    fn from(n: u32) -> Self {
        Self::retries(n)
    }
}

impl fmt::Display for RetryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited retries")
        } else {
            write!(f, "{} retries", self.0)
        }
    }
}
