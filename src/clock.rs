//! Time source injection
//!
//! Every timestamp the engine writes (JWT `iat`/`exp`, revocation times,
//! sweep cutoffs) comes from a [`Clock`], so the whole lifecycle is
//! testable without sleeping.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

/// Source of the current time
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as unix seconds
    fn now_unix(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    unix_secs: AtomicI64,
}

impl ManualClock {
    /// Create a clock pinned at the given unix time
    pub fn at(unix_secs: i64) -> Arc<Self> {
        Arc::new(Self {
            unix_secs: AtomicI64::new(unix_secs),
        })
    }

    /// Advance the clock by `secs` seconds
    pub fn advance(&self, secs: i64) {
        self.unix_secs.fetch_add(secs, Ordering::SeqCst);
    }

    /// Pin the clock to an absolute unix time
    pub fn set(&self, unix_secs: i64) {
        self.unix_secs.store(unix_secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.unix_secs.load(Ordering::SeqCst), 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        assert_eq!(clock.now_unix(), 1_000);

        clock.advance(60);
        assert_eq!(clock.now_unix(), 1_060);

        clock.set(500);
        assert_eq!(clock.now_unix(), 500);
    }

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now_unix();
        let b = clock.now_unix();
        assert!(b >= a);
    }
}
