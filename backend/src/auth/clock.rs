//! Wall clock abstraction
//!
//! Token expiry is always judged against an injected [`Clock`] so tests can
//! pin time instead of sleeping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock with millisecond resolution
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

/// Starts at the current wall time truncated to a whole second, so offsets
/// in whole seconds land exactly on token `exp` boundaries.
impl Default for ManualClock {
    fn default() -> Self {
        Self {
            millis: AtomicI64::new(Utc::now().timestamp() * 1000),
        }
    }
}

impl Clock for ManualClock {
    /// Saturates at the representable range instead of wrapping.
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(Ordering::SeqCst);
        match Utc.timestamp_millis_opt(millis).single() {
            Some(now) => now,
            None if millis < 0 => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_default_starts_on_whole_second() {
        let clock = ManualClock::default();
        assert_eq!(clock.now().timestamp_subsec_millis(), 0);
    }

    #[test]
    fn test_manual_clock_saturates_out_of_range() {
        let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC);
        clock.advance(Duration::days(365));
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);

        clock.set(DateTime::<Utc>::MIN_UTC);
        clock.advance(Duration::days(-365));
        assert_eq!(clock.now(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_system_clock_is_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
