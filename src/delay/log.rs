//! Logging decorator.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use super::Delay;

/// The message [`Log::new`] writes: `Sleeping {delay:?} then retrying`.
///
/// A zero delay renders as `0s`.
pub fn default_message(delay: Duration) -> String {
    if delay.is_zero() {
        return "Sleeping 0s then retrying".to_string();
    }
    format!("Sleeping {:?} then retrying", delay)
}

/// Reports every delay its inner strategy produces, then passes it through.
///
/// Each call writes `formatter(delay)` followed by a newline to the sink.
/// Write failures are ignored; the delay is returned either way.
///
/// # Examples
///
/// ```rust
/// use tenacious::delay::{constant, Delay, Log};
/// use std::time::Duration;
///
/// let mut out = Vec::new();
/// {
///     let mut delay = Log::with_options(
///         constant(Duration::from_millis(250)),
///         &mut out,
///         |d| format!("backing off for {:?}", d),
///     );
///     assert_eq!(delay.delay(1), Duration::from_millis(250));
/// }
/// assert_eq!(String::from_utf8(out).unwrap(), "backing off for 250ms\n");
/// ```
pub struct Log<D, W = io::Stdout, F = fn(Duration) -> String> {
    inner: D,
    sink: W,
    formatter: F,
}

impl<D> Log<D> {
    /// Log to standard output with [`default_message`].
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            sink: io::stdout(),
            formatter: default_message,
        }
    }
}

impl<D, W, F> Log<D, W, F>
where
    W: Write,
    F: FnMut(Duration) -> String,
{
    /// Log to `sink`, rendering each delay with `formatter`.
    pub fn with_options(inner: D, sink: W, formatter: F) -> Self {
        Self {
            inner,
            sink,
            formatter,
        }
    }

    /// Take back the inner strategy and the sink.
    pub fn into_parts(self) -> (D, W) {
        (self.inner, self.sink)
    }
}

impl<D, W, F> Delay for Log<D, W, F>
where
    D: Delay,
    W: Write,
    F: FnMut(Duration) -> String,
{
    fn delay(&mut self, iteration: u32) -> Duration {
        let sleep = self.inner.delay(iteration);
        let mut message = (self.formatter)(sleep);
        message.push('\n');
        if let Err(_err) = self.sink.write_all(message.as_bytes()) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Failed to write delay log line: {}", _err);
        }
        sleep
    }
}

impl<D: fmt::Debug, W, F> fmt::Debug for Log<D, W, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
