//! Basic backoff strategies.

use std::time::Duration;

use super::Delay;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// `base * factor`, saturating at [`Duration::MAX`].
fn scale(base: Duration, factor: u128) -> Duration {
    let nanos = base.as_nanos().saturating_mul(factor);
    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}

/// Always waits the same duration.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{constant, Delay};
/// use std::time::Duration;
///
/// let mut delay = constant(Duration::from_millis(500));
/// assert_eq!(delay.delay(1), Duration::from_millis(500));
/// assert_eq!(delay.delay(7), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    delay: Duration,
}

impl Constant {
    /// Create a constant strategy.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Delay for Constant {
    fn delay(&mut self, _iteration: u32) -> Duration {
        self.delay
    }
}

/// Delay grows by `base` each attempt: `base * iteration`.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{linear, Delay};
/// use std::time::Duration;
///
/// let mut delay = linear(Duration::from_millis(100));
/// assert_eq!(delay.delay(1), Duration::from_millis(100));
/// assert_eq!(delay.delay(2), Duration::from_millis(200));
/// assert_eq!(delay.delay(3), Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear {
    base: Duration,
}

impl Linear {
    /// Create a linear strategy.
    pub fn new(base: Duration) -> Self {
        Self { base }
    }
}

impl Delay for Linear {
    fn delay(&mut self, iteration: u32) -> Duration {
        self.base.saturating_mul(iteration)
    }
}

/// Delay doubles each attempt, starting at one second: `1s * 2^(iteration - 1)`.
///
/// The `base` duration is stored but does not scale the sequence; every
/// exponential strategy yields 1s, 2s, 4s, 8s, ... Use [`Exponential::base`]
/// to read it back.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{exponential, Delay};
/// use std::time::Duration;
///
/// let mut delay = exponential(Duration::from_millis(10));
/// assert_eq!(delay.delay(1), Duration::from_secs(1));
/// assert_eq!(delay.delay(2), Duration::from_secs(2));
/// assert_eq!(delay.delay(3), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exponential {
    base: Duration,
}

impl Exponential {
    const UNIT: Duration = Duration::from_secs(1);

    /// Create an exponential strategy.
    pub fn new(base: Duration) -> Self {
        Self { base }
    }

    /// The base duration this strategy was built with.
    pub fn base(&self) -> Duration {
        self.base
    }
}

impl Delay for Exponential {
    fn delay(&mut self, iteration: u32) -> Duration {
        let factor = 1u128
            .checked_shl(iteration.saturating_sub(1))
            .unwrap_or(u128::MAX);
        scale(Self::UNIT, factor)
    }
}

/// Delay follows the Fibonacci sequence: `base * fib(iteration)`.
///
/// This strategy is stateful. Each call past the second advances an internal
/// pair of sequence values by one step, so iterations must be requested in
/// order starting from 1, and every retry run needs a fresh instance (or a
/// [`reset`](Fibonacci::reset)). Sharing one instance between runs continues
/// the sequence where the previous run stopped.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{fibonacci, Delay};
/// use std::time::Duration;
///
/// let mut delay = fibonacci(Duration::from_millis(100));
/// let delays: Vec<_> = (1..=6).map(|i| delay.delay(i)).collect();
/// assert_eq!(
///     delays,
///     [100, 100, 200, 300, 500, 800].map(Duration::from_millis)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fibonacci {
    base: Duration,
    before_previous: u64,
    previous: u64,
}

impl Fibonacci {
    /// Create a Fibonacci strategy positioned at the start of the sequence.
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            before_previous: 1,
            previous: 1,
        }
    }

    /// Rewind to the start of the sequence.
    pub fn reset(&mut self) {
        self.before_previous = 1;
        self.previous = 1;
    }

    fn next_factor(&mut self, iteration: u32) -> u64 {
        if iteration <= 2 {
            return 1;
        }
        let next = self.before_previous.saturating_add(self.previous);
        self.before_previous = self.previous;
        self.previous = next;
        next
    }
}

impl Delay for Fibonacci {
    fn delay(&mut self, iteration: u32) -> Duration {
        let factor = self.next_factor(iteration);
        scale(self.base, u128::from(factor))
    }
}

/// Shorthand for [`Constant::new`].
pub fn constant(delay: Duration) -> Constant {
    Constant::new(delay)
}

/// A strategy that never waits.
pub fn no_delay() -> Constant {
    Constant::new(Duration::ZERO)
}

/// Shorthand for [`Linear::new`].
pub fn linear(base: Duration) -> Linear {
    Linear::new(base)
}

/// Shorthand for [`Exponential::new`].
pub fn exponential(base: Duration) -> Exponential {
    Exponential::new(base)
}

/// Shorthand for [`Fibonacci::new`].
pub fn fibonacci(base: Duration) -> Fibonacci {
    Fibonacci::new(base)
}
