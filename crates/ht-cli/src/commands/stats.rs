//! Stats command: portfolio overview and per-habit breakdown.
//!
//! Supports human-readable and JSON output.

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use ht_core::{Calendar, Habit, HabitSummary, Overview};
use serde::Serialize;

use super::util::{percent, progress_bar};

/// Computed statistics.
#[derive(Debug)]
pub struct StatsData {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub overview: Overview,
    pub habits: Vec<HabitSummary>,
}

pub fn generate_stats_data(
    habits: &[Habit],
    now: DateTime<Utc>,
    window_days: u32,
    calendar: &Calendar,
) -> StatsData {
    let summaries: Vec<HabitSummary> = habits
        .iter()
        .map(|h| HabitSummary::compute(h, now, window_days, calendar))
        .collect();
    let overview = Overview::from_summaries(habits, &summaries, now, window_days, calendar);

    StatsData {
        generated_at: now,
        timezone: calendar.timezone().name().to_string(),
        overview,
        habits: summaries,
    }
}

fn heading(output: &mut String, title: &str) {
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

/// Formats the human-readable stats output.
pub fn format_stats(data: &StatsData) -> String {
    let mut output = String::new();
    let o = &data.overview;

    heading(
        &mut output,
        &format!("HABIT STATISTICS (last {} days)", o.window_days),
    );

    if o.habit_count == 0 {
        writeln!(output, "No habits yet.").unwrap();
        return output;
    }

    writeln!(output, "Habits:             {}", o.habit_count).unwrap();
    writeln!(
        output,
        "Completed today:    {}/{}",
        o.completed_today, o.habit_count
    )
    .unwrap();
    writeln!(output, "Total completions:  {}", o.total_completions).unwrap();
    writeln!(
        output,
        "Avg. completion:    {}%",
        percent(o.average_completion_rate)
    )
    .unwrap();
    writeln!(output, "Best streak:        {}", o.best_streak).unwrap();
    writeln!(output, "Active streaks:     {}", o.active_streaks).unwrap();
    writeln!(output, "Avg. streak:        {}", o.average_streak).unwrap();
    writeln!(output, "Days active:        {}", o.days_active).unwrap();

    writeln!(output).unwrap();
    heading(&mut output, "BY HABIT");
    for habit in &data.habits {
        writeln!(
            output,
            "{:<20} streak {:>3}  best {:>3}  {:>3}%  {}",
            habit.name,
            habit.current_streak,
            habit.best_streak,
            percent(habit.completion_rate),
            progress_bar(habit.completion_rate)
        )
        .unwrap();
    }

    output
}

/// JSON stats structure.
#[derive(Debug, Serialize)]
pub struct JsonStats<'a> {
    pub generated_at: String,
    pub timezone: &'a str,
    pub overview: &'a Overview,
    pub habits: &'a [HabitSummary],
}

/// Formats stats data as JSON.
pub fn format_stats_json(data: &StatsData) -> Result<String> {
    let stats = JsonStats {
        generated_at: data.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        timezone: &data.timezone,
        overview: &data.overview,
        habits: &data.habits,
    };
    Ok(serde_json::to_string_pretty(&stats)?)
}

/// Runs the stats command.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    habits: &[Habit],
    now: DateTime<Utc>,
    calendar: &Calendar,
    window_days: u32,
    json: bool,
) -> Result<()> {
    let data = generate_stats_data(habits, now, window_days, calendar);
    if json {
        writeln!(writer, "{}", format_stats_json(&data)?)?;
    } else {
        write!(writer, "{}", format_stats(&data))?;
    }
    Ok(())
}
