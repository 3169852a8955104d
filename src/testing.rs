//! Testing utilities for code built on tenacious.
//!
//! This module provides deterministic stand-ins for the pieces of a retry run
//! that are awkward to test: random jitter and the delay schedule. It also has
//! assertion macros for [`RunError`](crate::RunError) and, with the `proptest`
//! feature, `Arbitrary` implementations for the configuration types.
//!
//! # Examples
//!
//! ## Recording the schedule
//!
//! ```rust
//! use tenacious::testing::RecordingDelay;
//! use tenacious::delay::{linear, Delay};
//! use std::time::Duration;
//!
//! let mut delay = RecordingDelay::new(linear(Duration::from_millis(10)));
//! delay.delay(1);
//! delay.delay(2);
//!
//! assert_eq!(delay.iterations(), &[1, 2]);
//! assert_eq!(delay.delays(), &[Duration::from_millis(10), Duration::from_millis(20)]);
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use tenacious::{assert_cancelled, assert_failed, CancelReason, RunError};
//!
//! let failed: Result<(), _> = Err(RunError::Failed("boom"));
//! assert_failed!(failed, "boom");
//!
//! let cancelled: Result<(), RunError<&str>> = Err(RunError::Cancelled(CancelReason::Cancelled));
//! assert_cancelled!(cancelled);
//! ```

use std::time::Duration;

use crate::delay::{Delay, RandomSource};

/// A [`RandomSource`] that always returns the same value.
///
/// `FixedRandom::MAX` pushes jitter to its upper bound, `FixedRandom::ZERO`
/// to its lower bound.
///
/// # Example
///
/// ```rust
/// use tenacious::testing::FixedRandom;
/// use tenacious::delay::{constant, Delay, Rand};
/// use std::time::Duration;
///
/// let mut delay = Rand::with_source(constant(Duration::from_secs(10)), FixedRandom::MAX);
/// assert_eq!(delay.delay(1), Duration::from_secs(11));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRandom(pub i64);

impl FixedRandom {
    /// The largest draw: jitter adds the full offset.
    pub const MAX: Self = Self(i64::MAX);
    /// The smallest draw: jitter subtracts the full offset.
    pub const ZERO: Self = Self(0);
}

impl RandomSource for FixedRandom {
    fn next_non_negative(&mut self) -> i64 {
        self.0
    }
}

/// A [`RandomSource`] that replays a fixed sequence of draws, cycling.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<i64>,
    next: usize,
}

impl SequenceRandom {
    /// Replay `values` in order. An empty sequence always draws zero.
    pub fn new(values: impl Into<Vec<i64>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_non_negative(&mut self) -> i64 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        value
    }
}

/// Wraps a strategy and records every request and answer.
#[derive(Debug, Clone)]
pub struct RecordingDelay<D> {
    inner: D,
    iterations: Vec<u32>,
    delays: Vec<Duration>,
}

impl<D> RecordingDelay<D> {
    /// Record calls made to `inner`.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            iterations: Vec::new(),
            delays: Vec::new(),
        }
    }

    /// The iterations requested so far, in order.
    pub fn iterations(&self) -> &[u32] {
        &self.iterations
    }

    /// The delays returned so far, in order.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Sum of every delay returned.
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl<D: Delay> Delay for RecordingDelay<D> {
    fn delay(&mut self, iteration: u32) -> Duration {
        let delay = self.inner.delay(iteration);
        self.iterations.push(iteration);
        self.delays.push(delay);
        delay
    }
}

/// Assert that a run failed with the given operation error.
///
/// This macro will panic if the result is `Ok` or a different `RunError`.
#[macro_export]
macro_rules! assert_failed {
    ($result:expr, $expected:expr) => {
        match $result {
            Err($crate::RunError::Failed(error)) => {
                assert_eq!(error, $expected);
            }
            other => {
                panic!("Expected RunError::Failed, got: {:?}", other);
            }
        }
    };
}

/// Assert that a run was cancelled.
///
/// This macro will panic unless the result is `Err(RunError::Cancelled(_))`.
#[macro_export]
macro_rules! assert_cancelled {
    ($result:expr) => {
        match $result {
            Err($crate::RunError::Cancelled(_)) => {}
            other => {
                panic!("Expected RunError::Cancelled, got: {:?}", other);
            }
        }
    };
    ($result:expr, $reason:expr) => {
        match $result {
            Err($crate::RunError::Cancelled(reason)) => {
                assert_eq!(reason, $reason);
            }
            other => {
                panic!("Expected RunError::Cancelled, got: {:?}", other);
            }
        }
    };
}

/// Assert that a run hit the retry-limit sentinel.
#[macro_export]
macro_rules! assert_too_many_retries {
    ($result:expr) => {
        match $result {
            Err($crate::RunError::TooManyRetries) => {}
            other => {
                panic!("Expected RunError::TooManyRetries, got: {:?}", other);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::RetryLimit {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(crate::RetryLimit::RETRY_FOREVER),
            (0u32..32).prop_map(crate::RetryLimit::retries),
        ]
        .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for crate::delay::Backoff {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use crate::delay::Backoff;

        let millis = (0u64..10_000).prop_map(Duration::from_millis);
        prop_oneof![
            Just(Backoff::None),
            millis.clone().prop_map(|delay| Backoff::Constant { delay }),
            millis.clone().prop_map(|base| Backoff::Linear { base }),
            millis.clone().prop_map(|base| Backoff::Exponential { base }),
            millis.prop_map(|base| Backoff::Fibonacci { base }),
        ]
        .boxed()
    }
}
