//! Time source for interest accrual
//!
//! Accrual timestamps must come from one injected monotonic source, never
//! from a caller-supplied value, so elapsed time cannot be manipulated.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Clock capability consumed by the bank
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Programmable clock for tests
///
/// Starts at a fixed instant and only moves when told to.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward by whole seconds
    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.write().unwrap();
        *now += Duration::seconds(secs as i64);
    }

    /// Jump to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write().unwrap() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance_secs(86_400);
        assert_eq!(clock.now(), start + Duration::seconds(86_400));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let later = start + Duration::seconds(3600);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
