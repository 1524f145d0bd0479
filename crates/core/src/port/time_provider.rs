// Time Provider Port (for testability)

use chrono::NaiveDate;
use std::sync::atomic::{AtomicI64, Ordering};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Current calendar date, used for past-date validation
    fn today(&self) -> NaiveDate;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Deterministic clock: a fixed date and a millisecond counter that advances
/// by one on every read, so successive request timestamps are strictly ordered.
pub struct SteppingTimeProvider {
    today: NaiveDate,
    next_millis: AtomicI64,
}

impl SteppingTimeProvider {
    pub fn new(today: NaiveDate, start_millis: i64) -> Self {
        Self {
            today,
            next_millis: AtomicI64::new(start_millis),
        }
    }
}

impl TimeProvider for SteppingTimeProvider {
    fn now_millis(&self) -> i64 {
        self.next_millis.fetch_add(1, Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
