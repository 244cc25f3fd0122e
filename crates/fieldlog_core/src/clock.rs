//! Time source and calendar helpers.
//!
//! # Responsibility
//! - Provide a deterministic "current moment" seam for stores and reports.
//! - Bucket timestamps into calendar months.
//!
//! # Invariants
//! - Month/year are extracted in the timestamp's own UTC offset, i.e. the
//!   wall-clock month the user saw when the entry was recorded.
//! - Month indices are zero-based (`0` = January).

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Timestamp type used by every persisted entity.
pub type Moment = DateTime<FixedOffset>;

/// One hour expressed in milliseconds.
pub const HOUR_MS: i64 = 60 * 60 * 1000;
/// One minute expressed in milliseconds.
pub const MINUTE_MS: i64 = 60 * 1000;

/// Source of the current moment.
pub trait Clock: Send + Sync {
    fn now(&self) -> Moment;

    /// Calendar year of [`Clock::now`].
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Clock handle shared by every store of one session.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock in the device's local offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Moment {
        Local::now().fixed_offset()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    epoch_ms: AtomicI64,
    offset: FixedOffset,
}

impl ManualClock {
    /// Creates a clock frozen at `moment`.
    pub fn new(moment: Moment) -> Self {
        Self {
            epoch_ms: AtomicI64::new(moment.timestamp_millis()),
            offset: *moment.offset(),
        }
    }

    /// Creates a UTC clock frozen at the given calendar date (noon).
    ///
    /// `month` is one-based here, matching how dates are written by hand.
    /// Returns `None` for an impossible date.
    pub fn at_utc(year: i32, month: u32, day: u32) -> Option<Self> {
        let moment = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()?
            .fixed_offset();
        Some(Self::new(moment))
    }

    pub fn set(&self, moment: Moment) {
        self.epoch_ms
            .store(moment.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.epoch_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Moment {
        let epoch_ms = self.epoch_ms.load(Ordering::SeqCst);
        let utc = DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default();
        utc.with_timezone(&self.offset)
    }
}

/// Local-offset moment for a Unix epoch in milliseconds.
///
/// Returns `None` when `epoch_ms` is outside chrono's representable range.
pub fn moment_from_epoch_ms(epoch_ms: i64) -> Option<Moment> {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|local| local.fixed_offset())
}

/// Resolves the report year: `0` means "the clock's current year".
pub fn resolve_year(year: i32, clock: &dyn Clock) -> i32 {
    if year == 0 {
        clock.current_year()
    } else {
        year
    }
}

/// Returns whether `date` falls in month `month` (0-11) of `year`.
///
/// A `year` of `0` compares against the clock's current year instead of
/// literal year zero. Month `0` is January and is always a real month.
pub fn is_same_month_and_year(date: &Moment, month: u32, year: i32, clock: &dyn Clock) -> bool {
    date.month0() == month && date.year() == resolve_year(year, clock)
}
