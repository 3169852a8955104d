//! Randomized jitter decorator.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::{RngCore, TryRngCore};

use super::Delay;

/// A source of uniformly distributed non-negative random integers.
///
/// [`Rand`] only needs one value per delay. Implement this to make jitter
/// deterministic in tests or to plug in a different generator.
pub trait RandomSource {
    /// A value uniformly distributed over `[0, i64::MAX]`.
    ///
    /// Negative values are tolerated; callers take the magnitude.
    fn next_non_negative(&mut self) -> i64;
}

/// Operating-system randomness with a thread-local fallback.
///
/// Draws from the OS cryptographic generator. If that fails, the value comes
/// from the thread-local generator instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn next_non_negative(&mut self) -> i64 {
        let raw = match OsRng.try_next_u64() {
            Ok(value) => value,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("OS random source unavailable, using thread rng: {}", _err);
                rand::rng().next_u64()
            }
        };
        // Top bit dropped: the result always fits in [0, i64::MAX].
        (raw >> 1) as i64
    }
}

/// Adds a random offset of up to ±10% to another strategy's delay.
///
/// For an inner delay `d`, the offset is drawn uniformly from
/// `[-d/10, +d/10]`, where `d/10` is integer nanosecond division (inner delays
/// under 10ns are returned unchanged). A fresh offset is drawn on every call.
/// The result never drops below zero.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{constant, Delay, Rand};
/// use std::time::Duration;
///
/// let mut delay = Rand::new(constant(Duration::from_secs(10)));
/// let d = delay.delay(1);
/// assert!(d >= Duration::from_secs(9) && d <= Duration::from_secs(11));
/// ```
#[derive(Debug, Clone)]
pub struct Rand<D, R = SystemRandom> {
    inner: D,
    source: R,
}

impl<D> Rand<D> {
    /// Jitter `inner` using [`SystemRandom`].
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            source: SystemRandom,
        }
    }
}

impl<D, R> Rand<D, R> {
    /// Jitter `inner` using a custom random source.
    pub fn with_source(inner: D, source: R) -> Self {
        Self { inner, source }
    }

    /// Unwrap the inner strategy.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Delay, R: RandomSource> Delay for Rand<D, R> {
    fn delay(&mut self, iteration: u32) -> Duration {
        let original = self.inner.delay(iteration);
        let max_offset = original / 10;
        offset_within(original, max_offset, self.source.next_non_negative())
    }
}

/// Shift `base` by `max * (2u - 1)`, where `u = |raw| / i64::MAX`.
fn offset_within(base: Duration, max: Duration, raw: i64) -> Duration {
    let magnitude = raw.checked_abs().unwrap_or(i64::MAX);
    let unit = magnitude as f64 / i64::MAX as f64;
    let offset_nanos = max.as_nanos() as f64 * (unit * 2.0 - 1.0);

    let shift = Duration::from_nanos(offset_nanos.abs() as u64);
    if offset_nanos >= 0.0 {
        base.saturating_add(shift)
    } else {
        base.saturating_sub(shift)
    }
}

#[cfg(test)]
mod jitter_tests {
    use super::*;
    use crate::delay::{constant, linear};

    struct Fixed(i64);

    impl RandomSource for Fixed {
        fn next_non_negative(&mut self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_max_draw_adds_full_offset() {
        let mut delay = Rand::with_source(constant(Duration::from_secs(10)), Fixed(i64::MAX));
        assert_eq!(delay.delay(1), Duration::from_secs(11));
    }

    #[test]
    fn test_zero_draw_subtracts_full_offset() {
        let mut delay = Rand::with_source(constant(Duration::from_secs(10)), Fixed(0));
        assert_eq!(delay.delay(1), Duration::from_secs(9));
    }

    #[test]
    fn test_negative_draw_uses_magnitude() {
        let mut pos = Rand::with_source(constant(Duration::from_secs(10)), Fixed(i64::MAX));
        let mut neg = Rand::with_source(constant(Duration::from_secs(10)), Fixed(-i64::MAX));
        assert_eq!(pos.delay(1), neg.delay(1));

        let mut min = Rand::with_source(constant(Duration::from_secs(10)), Fixed(i64::MIN));
        assert_eq!(min.delay(1), Duration::from_secs(11));
    }

    #[test]
    fn test_tiny_delays_are_not_jittered() {
        let mut delay = Rand::with_source(constant(Duration::from_nanos(9)), Fixed(0));
        assert_eq!(delay.delay(1), Duration::from_nanos(9));
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        let mut delay = Rand::new(constant(Duration::ZERO));
        for i in 1..=10 {
            assert_eq!(delay.delay(i), Duration::ZERO);
        }
    }

    #[test]
    fn test_system_random_stays_in_bounds() {
        let mut delay = Rand::new(linear(Duration::from_millis(100)));
        for i in 1..=50 {
            let base = Duration::from_millis(100) * i;
            let d = delay.delay(i);
            assert!(
                d >= base - base / 10 && d <= base + base / 10,
                "{:?} outside ±10% of {:?}",
                d,
                base
            );
        }
    }

    #[test]
    fn test_system_random_is_non_negative() {
        let mut source = SystemRandom;
        for _ in 0..100 {
            assert!(source.next_non_negative() >= 0);
        }
    }

    #[test]
    fn test_into_inner() {
        let delay = Rand::new(constant(Duration::from_secs(1)));
        assert_eq!(delay.into_inner(), constant(Duration::from_secs(1)));
    }
}
