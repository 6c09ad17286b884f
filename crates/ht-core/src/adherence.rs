//! Adherence over a trailing window.

use chrono::{DateTime, Utc};

use crate::calendar::{Calendar, Timestamped};

/// Window used by the statistics screens when none is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Completions in the trailing `window_days` divided by `window_days`.
///
/// The window is `[now - window_days calendar days, now]`, both ends
/// inclusive. Every completion in it counts, including several on the same
/// day, so the rate can exceed 1.0. A zero-length window yields 0.0.
pub fn completion_rate<C: Timestamped>(
    completions: &[C],
    window_days: u32,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let start = calendar.shift_days(now, -i64::from(window_days));
    let in_window = completions
        .iter()
        .filter(|c| (start..=now).contains(&c.instant()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let count = in_window as f64;
    count / f64::from(window_days)
}

/// Completions logged since the start of the current week.
///
/// Anything at or after the first instant of the week counts, future-dated
/// completions included.
pub fn completions_this_week<C: Timestamped>(
    completions: &[C],
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> usize {
    let week_start = calendar.start_of_day(calendar.week_start_of(calendar.day_key(now)));
    completions
        .iter()
        .filter(|c| c.instant() >= week_start)
        .count()
}
