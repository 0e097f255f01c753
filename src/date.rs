//! date.rs
//!
//! Date gating for the forty-day countdown that ends at the vernal equinox
//! (Nowruz). Everything here is pure: the caller passes "now" in, nothing
//! reads the system clock, and no function can fail.
//!
//! # Overview
//!
//! - **`equinox_for(year)`**: The equinox instant for `year`, from the
//!   embedded table or the `YYYY-03-20T12:00:00Z` fallback.
//! - **`next_equinox(now)`**: This year's equinox unless it has already
//!   passed, in which case next year's. Never earlier than `now`.
//! - **`days_remaining(now)`**: Ceiling of the time left until the next
//!   equinox, in whole days.
//! - **`current_day_index(now)`**: Maps the days remaining onto the
//!   countdown: 40 days left is day 1, 1 day left is day 40.
//! - **`is_accessible(day, now)`**: Whether a day's task is unlocked.
//! - **`unlock_instant(day, now)`**: When a day becomes unlocked.
//!
//! Arithmetic is plain UTC subtraction. Wall-clock days in the user's own
//! time zone are not considered.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseDayError;

/// Length of the countdown, in days.
pub const COUNTDOWN_DAYS: u32 = 40;

/// Vernal equinox instants in UTC as `(year, month, day, hour, minute)`.
const EQUINOX_TABLE: [(i32, u32, u32, u32, u32); 7] = [
    (2024, 3, 20, 3, 6),
    (2025, 3, 20, 9, 1),
    (2026, 3, 20, 14, 46),
    (2027, 3, 20, 20, 25),
    (2028, 3, 20, 2, 17),
    (2029, 3, 20, 8, 2),
    (2030, 3, 20, 13, 52),
];

static EQUINOXES: Lazy<HashMap<i32, DateTime<Utc>>> = Lazy::new(|| {
    EQUINOX_TABLE
        .iter()
        .filter_map(|&(year, month, day, hour, minute)| {
            Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
                .single()
                .map(|instant| (year, instant))
        })
        .collect()
});

/// A position in the countdown, always within `1..=40`.
///
/// Day 1 is the day on which exactly 40 days remain until the equinox and
/// day 40 the day on which one day remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DayIndex(u32);

impl DayIndex {
    pub const FIRST: DayIndex = DayIndex(1);
    pub const LAST: DayIndex = DayIndex(COUNTDOWN_DAYS);

    /// Returns `None` for anything outside `1..=40`.
    ///
    /// ```
    /// # use nowruz_countdown::date::DayIndex;
    /// assert_eq!(DayIndex::new(16).map(DayIndex::get), Some(16));
    /// assert!(DayIndex::new(0).is_none());
    /// assert!(DayIndex::new(41).is_none());
    /// ```
    pub fn new(day: u32) -> Option<Self> {
        if (1..=COUNTDOWN_DAYS).contains(&day) {
            Some(DayIndex(day))
        } else {
            None
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// All forty days in order.
    pub fn all() -> impl Iterator<Item = DayIndex> {
        (1..=COUNTDOWN_DAYS).map(DayIndex)
    }

    pub fn previous(self) -> Option<Self> {
        DayIndex::new(self.0 - 1)
    }

    pub fn next(self) -> Option<Self> {
        DayIndex::new(self.0 + 1)
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DayIndex {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseDayError::NotANumber(s.to_string()))?;
        DayIndex::new(day).ok_or(ParseDayError::OutOfRange(day))
    }
}

/// Returns the vernal equinox instant for `year`.
///
/// Tabulated years return their precomputed instant. Any other year gets
/// noon UTC on March 20. Years chrono cannot represent saturate to its
/// minimum or maximum instant.
///
/// ```
/// # use nowruz_countdown::date::equinox_for;
/// assert_eq!(equinox_for(2025).to_rfc3339(), "2025-03-20T09:01:00+00:00");
/// assert_eq!(equinox_for(2040).to_rfc3339(), "2040-03-20T12:00:00+00:00");
/// ```
pub fn equinox_for(year: i32) -> DateTime<Utc> {
    if let Some(instant) = EQUINOXES.get(&year) {
        return *instant;
    }
    match Utc.with_ymd_and_hms(year, 3, 20, 12, 0, 0).single() {
        Some(instant) => instant,
        None if year < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Returns the next equinox that has not yet passed.
///
/// The current year's instant is kept when `now` is exactly on it; only a
/// `now` strictly after it rolls over to the following year.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use nowruz_countdown::date::{equinox_for, next_equinox};
/// let before = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(next_equinox(before), equinox_for(2025));
///
/// let after = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
/// assert_eq!(next_equinox(after), equinox_for(2026));
/// ```
pub fn next_equinox(now: DateTime<Utc>) -> DateTime<Utc> {
    let this_year = equinox_for(now.year());
    if now > this_year {
        equinox_for(now.year().saturating_add(1))
    } else {
        this_year
    }
}

/// Whole days until the next equinox, rounded up.
///
/// A remainder of any size, even below a second, counts as a full day.
/// Zero only when `now` is exactly the equinox instant.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use nowruz_countdown::date::days_remaining;
/// let now = Utc.with_ymd_and_hms(2025, 2, 23, 9, 1, 0).unwrap();
/// assert_eq!(days_remaining(now), 25);
/// ```
pub fn days_remaining(now: DateTime<Utc>) -> i64 {
    ceil_days(next_equinox(now) - now)
}

fn ceil_days(delta: TimeDelta) -> i64 {
    // num_days truncates toward zero, which is already the ceiling for
    // negative deltas.
    let whole = delta.num_days();
    if delta > TimeDelta::days(whole) {
        whole + 1
    } else {
        whole
    }
}

/// Returns today's position in the countdown, or `None` outside the
/// forty-day window.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use nowruz_countdown::date::current_day_index;
/// let now = Utc.with_ymd_and_hms(2025, 2, 23, 9, 1, 0).unwrap();
/// assert_eq!(current_day_index(now).map(|d| d.get()), Some(16));
///
/// let summer = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
/// assert_eq!(current_day_index(summer), None);
/// ```
pub fn current_day_index(now: DateTime<Utc>) -> Option<DayIndex> {
    let remaining = days_remaining(now);
    if remaining < 1 || remaining > i64::from(COUNTDOWN_DAYS) {
        return None;
    }
    DayIndex::new(COUNTDOWN_DAYS + 1 - remaining as u32)
}

/// Whether `day`'s task may be opened at `now`.
///
/// Today and every earlier day are open; later days are locked, and
/// nothing is open outside the countdown window. Completion plays no part.
pub fn is_accessible(day: DayIndex, now: DateTime<Utc>) -> bool {
    current_day_index(now).is_some_and(|current| day <= current)
}

/// The first instant at which `day` counts as reached, measured against
/// the equinox that follows `now`.
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use nowruz_countdown::date::{unlock_instant, DayIndex};
/// let now = Utc.with_ymd_and_hms(2025, 2, 23, 9, 1, 0).unwrap();
/// let day = DayIndex::new(17).unwrap();
/// assert_eq!(
///     unlock_instant(day, now),
///     Utc.with_ymd_and_hms(2025, 2, 24, 9, 1, 0).unwrap()
/// );
/// ```
pub fn unlock_instant(day: DayIndex, now: DateTime<Utc>) -> DateTime<Utc> {
    let lead = COUNTDOWN_DAYS + 1 - day.get();
    next_equinox(now) - TimeDelta::days(i64::from(lead))
}
