//! Controllable clock for tests and simulations.

use chrono::{DateTime, Utc};
use portfoliohub_interface::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that only moves when told to.
///
/// Clones share the same instant.
///
/// # Examples
///
/// ```
/// use portfoliohub_interface::Clock;
/// use portfoliohub_storage::ManualClock;
///
/// let start = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
/// let clock = ManualClock::at(start);
/// clock.advance(chrono::Duration::hours(1));
/// assert_eq!(clock.now() - start, chrono::Duration::hours(1));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Clock pinned at `instant` (millisecond precision).
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(instant.timestamp_millis())),
        }
    }

    /// Jump to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis
            .store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move forward (or backward, for negative durations).
    pub fn advance(&self, by: chrono::Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
