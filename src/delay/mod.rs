//! Delay strategies for spacing out retry attempts.
//!
//! A [`Delay`] maps the 1-based index of the attempt about to be made to the
//! duration to wait before making it. Strategies are small values that can be
//! wrapped by decorators:
//!
//! - **Backoff**: [`Constant`], [`Linear`], [`Exponential`], [`Fibonacci`]
//! - **Decorators**: [`Rand`] adds ±10% jitter, [`Log`] reports each delay to a sink
//!
//! Decorators own their inner strategy and implement [`Delay`] themselves, so
//! they nest freely:
//!
//! ```rust
//! use tenacious::delay::{linear, Delay, DelayExt};
//! use std::time::Duration;
//!
//! let mut delay = linear(Duration::from_millis(100))
//!     .jitter()
//!     .logged_to(std::io::sink(), |d| format!("waiting {:?}", d));
//!
//! let d = delay.delay(2);
//! assert!(d >= Duration::from_millis(180) && d <= Duration::from_millis(220));
//! ```
//!
//! Any `FnMut(u32) -> Duration` closure becomes a strategy through [`from_fn`]:
//!
//! ```rust
//! use tenacious::delay::{from_fn, Delay};
//! use std::time::Duration;
//!
//! let mut square = from_fn(|i| Duration::from_millis(u64::from(i * i)));
//! assert_eq!(square.delay(3), Duration::from_millis(9));
//! ```

mod backoff;
mod config;
mod jitter;
mod log;

use std::io::Write;
use std::time::Duration;

pub use backoff::{constant, exponential, fibonacci, linear, no_delay};
pub use backoff::{Constant, Exponential, Fibonacci, Linear};
pub use config::{Backoff, DelayConfig};
pub use jitter::{Rand, RandomSource, SystemRandom};
pub use log::{default_message, Log};

/// A backoff strategy: the wait before a given retry attempt.
///
/// `iteration` is 1-based and names the attempt about to be waited for, not the
/// one that just failed. Implementations take `&mut self` so stateful
/// strategies such as [`Fibonacci`] can advance between calls.
pub trait Delay {
    /// Duration to wait before attempt `iteration`.
    fn delay(&mut self, iteration: u32) -> Duration;
}

/// A type-erased strategy, for strategies picked at runtime.
pub type BoxDelay = Box<dyn Delay + Send>;

/// A strategy backed by a closure. Created by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Turn a closure into a [`Delay`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(u32) -> Duration,
{
    FromFn { f }
}

impl<F> Delay for FromFn<F>
where
    F: FnMut(u32) -> Duration,
{
    fn delay(&mut self, iteration: u32) -> Duration {
        (self.f)(iteration)
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay(&mut self, iteration: u32) -> Duration {
        (**self).delay(iteration)
    }
}

impl<D: Delay + ?Sized> Delay for Box<D> {
    fn delay(&mut self, iteration: u32) -> Duration {
        (**self).delay(iteration)
    }
}

/// Extension methods for stacking decorators onto any [`Delay`].
pub trait DelayExt: Delay + Sized {
    /// Wrap in [`Rand`], adding up to ±10% jitter.
    fn jitter(self) -> Rand<Self> {
        Rand::new(self)
    }

    /// Wrap in [`Log`], printing each delay to standard output.
    fn logged(self) -> Log<Self> {
        Log::new(self)
    }

    /// Wrap in [`Log`] with a custom sink and message.
    fn logged_to<W, F>(self, sink: W, formatter: F) -> Log<Self, W, F>
    where
        W: Write,
        F: FnMut(Duration) -> String,
    {
        Log::with_options(self, sink, formatter)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxDelay
    where
        Self: Send + 'static,
    {
        Box::new(self)
    }
}

impl<D: Delay> DelayExt for D {}
