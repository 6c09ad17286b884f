//! Streak computation.
//!
//! A streak is a run of consecutive calendar days that each have at least one
//! completion. Several completions on one day count as that day once.
//!
//! # Anchoring
//!
//! [`current_streak`] is anchored at "now": it starts from today when today is
//! already done, otherwise from yesterday, so an in-progress day does not break
//! the streak. Completions dated after today are skipped.
//!
//! [`best_streak`] looks at the whole history and ignores "now", so
//! future-dated completions do count there.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::calendar::{Calendar, DayKey, Timestamped, days_between};

/// Distinct day keys of a completion list, ascending.
fn distinct_days<C: Timestamped>(completions: &[C], calendar: &Calendar) -> BTreeSet<DayKey> {
    completions
        .iter()
        .map(|c| calendar.day_key(c.instant()))
        .collect()
}

/// Whether any completion falls on the same local day as `now`.
pub fn is_completed_today<C: Timestamped>(
    completions: &[C],
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> bool {
    let today = calendar.day_key(now);
    completions
        .iter()
        .any(|c| calendar.day_key(c.instant()) == today)
}

/// Length of the unbroken run of completed days ending today or yesterday.
///
/// Returns 0 when there are no completions or the latest completed day is
/// more than one day before `now`.
pub fn current_streak<C: Timestamped>(
    completions: &[C],
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> u32 {
    let today = calendar.day_key(now);
    let days = distinct_days(completions, calendar);

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today.pred()
    };

    let mut streak: u32 = 0;
    for &day in days.iter().rev() {
        if day == cursor {
            streak = streak.saturating_add(1);
            cursor = cursor.pred();
        } else if day < cursor {
            break;
        }
    }
    streak
}

/// Longest run of consecutive completed days over the whole history.
pub fn best_streak<C: Timestamped>(completions: &[C], calendar: &Calendar) -> u32 {
    let days = distinct_days(completions, calendar);
    let mut iter = days.iter().copied();
    let Some(mut prev) = iter.next() else {
        return 0;
    };

    let mut best: u32 = 1;
    let mut run: u32 = 1;
    for day in iter {
        match days_between(prev, day) {
            1 => {
                run = run.saturating_add(1);
                best = best.max(run);
            }
            gap if gap > 1 => run = 1,
            // same day: nothing to extend
            _ => {}
        }
        prev = day;
    }
    best
}
