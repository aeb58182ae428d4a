//! Time source for due-date computation
//!
//! The engine never reads the system clock directly; it asks a [`Clock`].
//! Tests inject a [`FixedClock`].

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

/// Seconds in one scheduling day
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Freeze at `instant`
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Midnight UTC of the day `days` after `now`.
///
/// All reviews on the same UTC day with the same interval share one due date.
pub fn due_date(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let day = now
        .date_naive()
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Fractional days from `from` to `to`, never negative.
///
/// Stores use this to fill `elapsed_days` before calling the engine.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let seconds = to.signed_duration_since(from).num_seconds() as f64;
    (seconds / SECONDS_PER_DAY).max(0.0)
}
