//! Calendar normalization.
//!
//! Every day comparison in the engine goes through a [`Calendar`], which maps
//! an instant to a [`DayKey`] under one fixed timezone. Two completions logged
//! at 07:00 and 23:30 on the same local date share a day key and are treated as
//! the same day.
//!
//! The timezone is injected rather than read from the environment at every
//! call, so tests can pin both "now" and the zone.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The timezone name is not in the IANA database.
    #[error("unknown timezone: {name}")]
    UnknownTimezone { name: String },
}

/// Anything that happened at a single instant and can be placed on a calendar.
///
/// Lets the engine work on stored completions as well as bare timestamps
/// (test fixtures, records from another store).
pub trait Timestamped {
    /// The instant the record refers to.
    fn instant(&self) -> DateTime<Utc>;
}

impl Timestamped for DateTime<Utc> {
    fn instant(&self) -> DateTime<Utc> {
        *self
    }
}

/// A calendar day with no time-of-day component.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// The day `days` calendar days away (negative goes back).
    ///
    /// Saturates at chrono's supported date range.
    #[must_use]
    pub fn offset(self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted.map_or(self, Self)
    }

    /// The previous calendar day.
    #[must_use]
    pub fn pred(self) -> Self {
        self.offset(-1)
    }

    /// Weekday index with 0 = Sunday through 6 = Saturday.
    #[must_use]
    pub fn weekday_index(self) -> u8 {
        // num_days_from_sunday is always < 7
        u8::try_from(self.0.weekday().num_days_from_sunday()).unwrap_or(0)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Signed number of calendar days from `a` to `b` (`b - a`).
#[must_use]
pub fn days_between(a: DayKey, b: DayKey) -> i64 {
    (b.0 - a.0).num_days()
}

/// Timezone and week policy used to bucket instants into days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
    week_start: Weekday,
}

impl Calendar {
    /// A calendar in the given zone, weeks starting on Monday.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self {
            tz,
            week_start: Weekday::Mon,
        }
    }

    /// A UTC calendar.
    #[must_use]
    pub const fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// A calendar for an IANA zone name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Result<Self, CalendarError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| CalendarError::UnknownTimezone {
                name: name.to_string(),
            })
    }

    /// The system's local calendar.
    ///
    /// Falls back to UTC when the system zone cannot be detected or is not
    /// in the bundled zone database.
    #[must_use]
    pub fn local() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => Self::from_name(&name).unwrap_or_else(|err| {
                tracing::warn!(%err, "system timezone not recognized, using UTC");
                Self::utc()
            }),
            Err(err) => {
                tracing::warn!(%err, "could not detect system timezone, using UTC");
                Self::utc()
            }
        }
    }

    /// Returns this calendar with a different first day of the week.
    #[must_use]
    pub const fn with_week_start(self, week_start: Weekday) -> Self {
        Self { week_start, ..self }
    }

    /// The configured timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// The configured first day of the week.
    #[must_use]
    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Truncates an instant to its local calendar day.
    #[must_use]
    pub fn day_key(&self, instant: DateTime<Utc>) -> DayKey {
        DayKey(instant.with_timezone(&self.tz).date_naive())
    }

    /// Whether two instants fall on the same local calendar day.
    #[must_use]
    pub fn is_same_day(&self, x: DateTime<Utc>, y: DateTime<Utc>) -> bool {
        self.day_key(x) == self.day_key(y)
    }

    /// The first instant of a local calendar day.
    ///
    /// On a DST fall-back the earlier instant wins. When midnight does not
    /// exist (spring-forward at 00:00) 01:00 local is used instead.
    #[must_use]
    pub fn start_of_day(&self, day: DayKey) -> DateTime<Utc> {
        let midnight = day.0.and_time(NaiveTime::MIN);
        match self.tz.from_local_datetime(&midnight) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => {
                let one_am = midnight + Duration::hours(1);
                self.tz
                    .from_local_datetime(&one_am)
                    .earliest()
                    .map_or_else(|| Utc.from_utc_datetime(&midnight), |dt| dt.with_timezone(&Utc))
            }
        }
    }

    /// Moves an instant by whole calendar days, keeping its local wall-clock time.
    ///
    /// Across a DST change the result differs from `days * 24h`. If the target
    /// wall-clock time does not exist, the fixed-length shift is used.
    #[must_use]
    pub fn shift_days(&self, instant: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        let local = instant.with_timezone(&self.tz).naive_local();
        let shifted = if days >= 0 {
            local.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            local.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .and_then(|naive| self.tz.from_local_datetime(&naive).earliest())
            .map_or_else(
                || instant + Duration::days(days),
                |dt| dt.with_timezone(&Utc),
            )
    }

    /// The first day of the week containing `day`.
    #[must_use]
    pub fn week_start_of(&self, day: DayKey) -> DayKey {
        let weekday = day.0.weekday().num_days_from_monday();
        let start = self.week_start.num_days_from_monday();
        let since_start = (7 + weekday - start) % 7;
        day.offset(-i64::from(since_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::from_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn day_key_truncates_time_of_day() {
        let cal = Calendar::utc();
        assert_eq!(cal.day_key(at("2025-03-10T00:00:00Z")), date(2025, 3, 10));
        assert_eq!(cal.day_key(at("2025-03-10T23:59:59Z")), date(2025, 3, 10));
    }

    #[test]
    fn day_key_depends_on_timezone() {
        let instant = at("2025-03-10T23:30:00Z");
        let utc = Calendar::utc();
        let tokyo = Calendar::from_name("Asia/Tokyo").unwrap();
        let la = Calendar::from_name("America/Los_Angeles").unwrap();

        assert_eq!(utc.day_key(instant), date(2025, 3, 10));
        assert_eq!(tokyo.day_key(instant), date(2025, 3, 11));
        assert_eq!(la.day_key(instant), date(2025, 3, 10));
    }

    #[test]
    fn is_same_day_ignores_time() {
        let cal = Calendar::from_name("Europe/Berlin").unwrap();
        // 06:00 and 23:30 Berlin time on the same date
        assert!(cal.is_same_day(at("2025-06-01T04:00:00Z"), at("2025-06-01T21:30:00Z")));
        // 23:30 UTC is already the next day in Berlin
        assert!(!cal.is_same_day(at("2025-06-01T04:00:00Z"), at("2025-06-01T23:30:00Z")));
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2025, 1, 30), date(2025, 2, 2)), 3);
        assert_eq!(days_between(date(2025, 2, 2), date(2025, 1, 30)), -3);
        assert_eq!(days_between(date(2025, 2, 2), date(2025, 2, 2)), 0);
    }

    #[test]
    fn from_name_rejects_unknown_zone() {
        let err = Calendar::from_name("Mars/Olympus").unwrap_err();
        assert_eq!(err.to_string(), "unknown timezone: Mars/Olympus");
    }

    #[test]
    fn start_of_day_in_zone() {
        let cal = Calendar::from_name("America/New_York").unwrap();
        // EST is UTC-5 in January
        assert_eq!(
            cal.start_of_day(date(2025, 1, 15)),
            at("2025-01-15T05:00:00Z")
        );
        assert_eq!(cal.day_key(cal.start_of_day(date(2025, 1, 15))), date(2025, 1, 15));
    }

    #[test]
    fn start_of_day_across_midnight_dst_gap() {
        // Santiago springs forward at 00:00 local, so midnight does not exist
        let cal = Calendar::from_name("America/Santiago").unwrap();
        let day = date(2024, 9, 8);
        let start = cal.start_of_day(day);
        assert_eq!(cal.day_key(start), day);
    }

    #[test]
    fn shift_days_keeps_wall_clock_across_dst() {
        let cal = Calendar::from_name("Europe/Berlin").unwrap();
        // 12:00 CEST on 2025-03-31, clocks went forward on 2025-03-30
        let now = at("2025-03-31T10:00:00Z");
        let back = cal.shift_days(now, -2);
        // 12:00 CET on 2025-03-29
        assert_eq!(back, at("2025-03-29T11:00:00Z"));
    }

    #[test]
    fn shift_days_in_utc_is_fixed_length() {
        let cal = Calendar::utc();
        let now = at("2025-03-31T10:00:00Z");
        assert_eq!(cal.shift_days(now, -30), at("2025-03-01T10:00:00Z"));
        assert_eq!(cal.shift_days(now, 1), at("2025-04-01T10:00:00Z"));
    }

    #[test]
    fn week_start_of_monday_weeks() {
        let cal = Calendar::utc();
        // 2025-01-29 is a Wednesday
        assert_eq!(cal.week_start_of(date(2025, 1, 29)), date(2025, 1, 27));
        assert_eq!(cal.week_start_of(date(2025, 1, 27)), date(2025, 1, 27));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(cal.week_start_of(date(2025, 2, 2)), date(2025, 1, 27));
    }

    #[test]
    fn week_start_of_sunday_weeks() {
        let cal = Calendar::utc().with_week_start(Weekday::Sun);
        assert_eq!(cal.week_start_of(date(2025, 1, 29)), date(2025, 1, 26));
        assert_eq!(cal.week_start_of(date(2025, 2, 2)), date(2025, 2, 2));
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        assert_eq!(date(2025, 2, 2).weekday_index(), 0); // Sunday
        assert_eq!(date(2025, 1, 27).weekday_index(), 1); // Monday
        assert_eq!(date(2025, 2, 1).weekday_index(), 6); // Saturday
    }

    #[test]
    fn day_key_display() {
        assert_eq!(date(2025, 1, 5).to_string(), "2025-01-05");
    }

    #[test]
    fn pred_steps_back_over_month_boundary() {
        assert_eq!(date(2025, 3, 1).pred(), date(2025, 2, 28));
    }
}
