//! Scoped duration measurement.

use std::time::{Duration, Instant};

/// Logs how long a scope took when dropped.
///
/// Measurement only: it never cancels or limits the work it wraps.
///
/// ```rust
/// use bipartite_embeddings::timing::PerformanceTimer;
///
/// let elapsed = {
///     let timer = PerformanceTimer::start("Node embeddings calculation");
///     // ... work ...
///     timer.elapsed()
/// };
/// assert!(elapsed.as_secs() < 60);
/// ```
#[derive(Debug)]
pub struct PerformanceTimer {
    message: &'static str,
    start: Instant,
}

impl PerformanceTimer {
    /// Start timing a scope labelled `message`.
    pub fn start(message: &'static str) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl PerformanceTimer {
    fn report(&self) -> Duration {
        let elapsed = self.start.elapsed();
        tracing::info!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "{} took {:.2?}",
            self.message,
            elapsed
        );
        elapsed
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        self.report();
    }
}

/// Run `f` inside a [`PerformanceTimer`].
pub fn performance_measuring<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let _timer = PerformanceTimer::start(message);
    f()
}
