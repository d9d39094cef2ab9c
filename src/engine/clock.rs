//! Clock abstraction for the timer engine.
//!
//! The session computes its countdown from a wall-clock deadline, so tests
//! need a way to control "now". `SystemClock` reads the tokio clock (which
//! respects `tokio::time::pause` in tests); `ManualClock` is advanced by hand
//! for synchronous state-machine tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::time::{Duration, Instant};

/// Source of the current instant for the timer session.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the tokio runtime clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests.
///
/// Cloning shares the underlying offset, so a clone held by a session and a
/// clone held by the test advance together.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a new manual clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.epoch + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}
