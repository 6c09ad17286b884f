//! Status command: today's checklist.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ht_core::{Calendar, Habit, HabitSummary};

pub fn run<W: Write>(
    writer: &mut W,
    habits: &[Habit],
    now: DateTime<Utc>,
    calendar: &Calendar,
    window_days: u32,
) -> Result<()> {
    let today = calendar.day_key(now);
    writeln!(writer, "{}", today.date().format("%A, %b %-d, %Y"))?;
    writeln!(writer)?;

    if habits.is_empty() {
        writeln!(writer, "No habits yet.")?;
        return Ok(());
    }

    let summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|h| HabitSummary::compute(h, now, window_days, calendar))
        .collect();

    for summary in &summaries {
        let mark = if summary.completed_today { "✓" } else { "·" };
        let suffix = if summary.scheduled_today {
            ""
        } else {
            " (rest day)"
        };
        writeln!(
            writer,
            "{mark} {:<20}  {} day streak{suffix}",
            summary.name, summary.current_streak
        )?;
    }

    let done = summaries.iter().filter(|s| s.completed_today).count();
    writeln!(writer)?;
    if done == summaries.len() {
        writeln!(writer, "All {done} habits completed today!")?;
    } else {
        writeln!(writer, "{done}/{} habits completed today", summaries.len())?;
    }

    Ok(())
}
