//! Calendar command: which of the last N days a habit was done.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use ht_core::{Calendar, Habit, habit_calendar};

pub fn run<W: Write>(
    writer: &mut W,
    habit: &Habit,
    days: u32,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> Result<()> {
    let cells = habit_calendar(habit, days, now, calendar);
    writeln!(writer, "{}: last {days} days", habit.name)?;

    for cell in &cells {
        let mark = if cell.completed { "✓" } else { "·" };
        writeln!(writer, "{}  {mark}", cell.day.date().format("%a %Y-%m-%d"))?;
    }

    let completed = cells.iter().filter(|c| c.completed).count();
    writeln!(writer)?;
    writeln!(writer, "{completed} of {} days completed", cells.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn calendar_for_last_week() {
        let habits = fixtures::habits();
        let mut output = Vec::new();
        run(&mut output, &habits[0], 7, fixtures::now(), &Calendar::utc()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Read: last 7 days
        Thu 2025-01-23  ✓
        Fri 2025-01-24  ✓
        Sat 2025-01-25  ·
        Sun 2025-01-26  ·
        Mon 2025-01-27  ✓
        Tue 2025-01-28  ✓
        Wed 2025-01-29  ✓

        5 of 7 days completed
        ");
    }

    #[test]
    fn calendar_follows_timezone() {
        let habits = fixtures::habits();
        // Completions at 18:00 UTC land on the next day in Tokyo
        let tokyo = Calendar::from_name("Asia/Tokyo").unwrap();
        let mut output = Vec::new();
        run(&mut output, &habits[0], 7, fixtures::now(), &tokyo).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("Read: last 7 days\nFri 2025-01-24  ✓\n"));
        assert!(output.contains("Mon 2025-01-27  ·"));
        assert!(output.contains("Thu 2025-01-30  ✓"));
        assert!(output.ends_with("5 of 7 days completed\n"));
    }
}
