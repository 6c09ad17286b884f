//! Activity command: completions per day across all habits.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ht_core::{Calendar, Habit, daily_activity};

use super::util::progress_bar;

pub fn run<W: Write>(
    writer: &mut W,
    habits: &[Habit],
    days: u32,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> Result<()> {
    let title = format!("ACTIVITY (last {days} days)");
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "─".repeat(title.chars().count()))?;

    for day in daily_activity(habits, days, now, calendar) {
        writeln!(
            writer,
            "{}  {:>3}  {}",
            day.day.date().format("%a %Y-%m-%d"),
            day.completions,
            progress_bar(day.intensity)
        )?;
    }
    Ok(())
}
