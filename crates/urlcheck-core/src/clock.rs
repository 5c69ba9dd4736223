//! Wall-clock access for the throttle.
//!
//! Throttle state is persisted as absolute instants, so everything here works
//! in milliseconds since the Unix epoch rather than `Instant`.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, TimeZone};

/// Absolute point in time, milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// `self + d`, clamped at `i64::MAX` milliseconds.
    pub fn saturating_add(self, d: Duration) -> Self {
        let ms = i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(ms))
    }

    /// Time left until `later`, zero if `later` is not after `self`.
    pub fn until(self, later: Timestamp) -> Duration {
        let diff = later.0.saturating_sub(self.0);
        Duration::from_millis(u64::try_from(diff).unwrap_or(0))
    }

    /// Parse the persisted form (decimal milliseconds).
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<i64>().ok().map(Self)
    }

    /// Convert to a zoned date-time; `None` if out of chrono's range.
    pub fn to_zoned<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.0).single()
    }

    pub fn to_local(self) -> Option<DateTime<Local>> {
        self.to_zoned(&Local)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A clock before 1970 reads as the epoch.
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp(ms)
    }
}

/// Manually driven clock. Clones share the same time, so a test can hold one
/// handle and advance the clock seen by a controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.as_millis())),
        }
    }

    pub fn set(&self, t: Timestamp) {
        self.millis.store(t.as_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, d: Duration) {
        let next = self.now().saturating_add(d);
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parse_accepts_padded_millis() {
        assert_eq!(Timestamp::parse(" 1700000000000\n"), Some(Timestamp::from_millis(1_700_000_000_000)));
        assert_eq!(Timestamp::parse("soon"), None);
        assert_eq!(Timestamp::parse(""), None);
    }

    #[test]
    fn until_is_zero_for_past_instants() {
        let a = Timestamp::from_millis(5_000);
        let b = Timestamp::from_millis(2_000);
        assert_eq!(a.until(b), Duration::ZERO);
        assert_eq!(b.until(a), Duration::from_secs(3));
    }

    #[test]
    fn saturating_add_clamps() {
        let t = Timestamp::from_millis(i64::MAX - 1);
        assert_eq!(t.saturating_add(Duration::from_secs(10)).as_millis(), i64::MAX);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(Timestamp::from_millis(1_000));
        let view = clock.clone();
        clock.advance(Duration::from_millis(500));
        assert_eq!(view.now(), Timestamp::from_millis(1_500));
    }

    #[test]
    fn to_zoned_utc() {
        let dt = Timestamp::from_millis(0).to_zoned(&Utc).unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now().as_millis() > 1_577_836_800_000);
    }
}
