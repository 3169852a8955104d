//! Declarative delay configuration.

use std::time::Duration;

use super::{BoxDelay, Constant, DelayExt, Exponential, Fibonacci, Linear};

/// Which backoff sequence to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Fixed delay between attempts.
    Constant {
        /// Delay before every retry.
        delay: Duration,
    },
    /// `base * iteration`.
    Linear {
        /// Step size.
        base: Duration,
    },
    /// `1s * 2^(iteration - 1)`; `base` is carried but unused.
    Exponential {
        /// Base delay duration.
        base: Duration,
    },
    /// `base * fib(iteration)`.
    Fibonacci {
        /// Base delay duration.
        base: Duration,
    },
}

/// A delay strategy described as data.
///
/// The configuration is plain data and can be cloned, compared and (with the
/// `serde` feature) deserialized. [`build`](DelayConfig::build) turns it into a
/// live strategy: the backoff, wrapped in jitter, wrapped in logging.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{Backoff, Delay, DelayConfig};
/// use std::time::Duration;
///
/// let config = DelayConfig::new(Backoff::Fibonacci { base: Duration::from_millis(10) });
///
/// let mut delay = config.build();
/// assert_eq!(delay.delay(1), Duration::from_millis(10));
/// assert_eq!(delay.delay(2), Duration::from_millis(10));
/// assert_eq!(delay.delay(3), Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayConfig {
    /// The backoff sequence.
    pub backoff: Backoff,
    /// Apply ±10% jitter.
    #[cfg_attr(feature = "serde", serde(default))]
    pub jitter: bool,
    /// Print each delay to standard output.
    #[cfg_attr(feature = "serde", serde(default))]
    pub log: bool,
}

impl DelayConfig {
    /// Configure `backoff` with no decorators.
    pub fn new(backoff: Backoff) -> Self {
        Self {
            backoff,
            jitter: false,
            log: false,
        }
    }

    /// Enable jitter.
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Enable logging to standard output.
    pub fn with_log(mut self) -> Self {
        self.log = true;
        self
    }

    /// Build a fresh strategy.
    ///
    /// Every call starts from scratch, so stateful backoffs such as Fibonacci
    /// are safe to build once per run.
    pub fn build(&self) -> BoxDelay {
        let mut delay = match self.backoff {
            Backoff::None => Constant::new(Duration::ZERO).boxed(),
            Backoff::Constant { delay } => Constant::new(delay).boxed(),
            Backoff::Linear { base } => Linear::new(base).boxed(),
            Backoff::Exponential { base } => Exponential::new(base).boxed(),
            Backoff::Fibonacci { base } => Fibonacci::new(base).boxed(),
        };
        if self.jitter {
            delay = delay.jitter().boxed();
        }
        if self.log {
            delay = delay.logged().boxed();
        }
        delay
    }
}

impl From<Backoff> for DelayConfig {
    fn from(backoff: Backoff) -> Self {
        Self::new(backoff)
    }
}
