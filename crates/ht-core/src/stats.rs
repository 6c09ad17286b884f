//! Aggregate statistics across habits.
//!
//! Everything here is a read-only projection built on the streak and
//! adherence functions; nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adherence::{completion_rate, completions_this_week};
use crate::calendar::{Calendar, DayKey, days_between};
use crate::habit::Habit;
use crate::streak::{best_streak, current_streak, is_completed_today};
use crate::types::HabitId;

/// Derived values for one habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitSummary {
    pub id: HabitId,
    pub name: String,
    pub completed_today: bool,
    /// Whether the habit's frequency schedules it for today.
    pub scheduled_today: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub completion_rate: f64,
    pub total_completions: usize,
    pub completions_this_week: usize,
}

impl HabitSummary {
    pub fn compute(habit: &Habit, now: DateTime<Utc>, window_days: u32, calendar: &Calendar) -> Self {
        let completions = habit.completions();
        Self {
            id: habit.id.clone(),
            name: habit.name.to_string(),
            completed_today: is_completed_today(completions, now, calendar),
            scheduled_today: habit.frequency.is_scheduled_on(calendar.day_key(now)),
            current_streak: current_streak(completions, now, calendar),
            best_streak: best_streak(completions, calendar),
            completion_rate: completion_rate(completions, window_days, now, calendar),
            total_completions: completions.len(),
            completions_this_week: completions_this_week(completions, now, calendar),
        }
    }
}

/// Portfolio-level statistics over all habits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub habit_count: usize,
    /// Habits with at least one completion today.
    pub completed_today: usize,
    /// True when there is at least one habit and all are done today.
    pub all_completed_today: bool,
    pub total_completions: usize,
    /// Mean of the per-habit completion rates.
    pub average_completion_rate: f64,
    /// Best streak of any habit.
    pub best_streak: u32,
    /// Sum of current streaks.
    pub active_streaks: u32,
    /// Integer mean of current streaks, rounded down.
    pub average_streak: u32,
    /// Calendar days since the oldest habit was created, at least 1.
    pub days_active: i64,
    pub window_days: u32,
}

impl Overview {
    pub fn compute(habits: &[Habit], now: DateTime<Utc>, window_days: u32, calendar: &Calendar) -> Self {
        let summaries: Vec<HabitSummary> = habits
            .iter()
            .map(|h| HabitSummary::compute(h, now, window_days, calendar))
            .collect();
        Self::from_summaries(habits, &summaries, now, window_days, calendar)
    }

    /// Builds the overview from already computed summaries of `habits`.
    pub fn from_summaries(
        habits: &[Habit],
        summaries: &[HabitSummary],
        now: DateTime<Utc>,
        window_days: u32,
        calendar: &Calendar,
    ) -> Self {
        let habit_count = summaries.len();
        let completed_today = summaries.iter().filter(|s| s.completed_today).count();
        let active_streaks: u32 = summaries
            .iter()
            .fold(0, |acc, s| acc.saturating_add(s.current_streak));

        #[allow(clippy::cast_precision_loss)]
        let average_completion_rate = if habit_count == 0 {
            0.0
        } else {
            summaries.iter().map(|s| s.completion_rate).sum::<f64>() / habit_count as f64
        };

        let average_streak = u32::try_from(habit_count)
            .ok()
            .filter(|&n| n > 0)
            .map_or(0, |n| active_streaks / n);

        let days_active = habits
            .iter()
            .map(|h| h.created_at)
            .min()
            .map_or(0, |first| {
                days_between(calendar.day_key(first), calendar.day_key(now)).max(1)
            });

        tracing::debug!(habit_count, completed_today, active_streaks, "computed overview");

        Self {
            habit_count,
            completed_today,
            all_completed_today: habit_count > 0 && completed_today == habit_count,
            total_completions: summaries.iter().map(|s| s.total_completions).sum(),
            average_completion_rate,
            best_streak: summaries.iter().map(|s| s.best_streak).max().unwrap_or(0),
            active_streaks,
            average_streak,
            days_active,
            window_days,
        }
    }
}

/// Completion activity on one day across all habits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayActivity {
    pub day: DayKey,
    /// Every completion on the day, duplicates included.
    pub completions: usize,
    /// `completions / habit_count`; 0.0 without habits. May exceed 1.0.
    pub intensity: f64,
}

/// Activity for the trailing `days` days ending today, oldest first.
pub fn daily_activity(habits: &[Habit], days: u32, now: DateTime<Utc>, calendar: &Calendar) -> Vec<DayActivity> {
    trailing_days(days, now, calendar)
        .map(|day| {
            let completions = habits
                .iter()
                .flat_map(Habit::completions)
                .filter(|c| calendar.day_key(c.date) == day)
                .count();
            #[allow(clippy::cast_precision_loss)]
            let intensity = if habits.is_empty() {
                0.0
            } else {
                completions as f64 / habits.len() as f64
            };
            DayActivity {
                day,
                completions,
                intensity,
            }
        })
        .collect()
}

/// One cell of a habit's completion calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: DayKey,
    pub completed: bool,
}

/// Completion flags for the trailing `days` days ending today, oldest first.
pub fn habit_calendar(habit: &Habit, days: u32, now: DateTime<Utc>, calendar: &Calendar) -> Vec<CalendarDay> {
    trailing_days(days, now, calendar)
        .map(|day| CalendarDay {
            day,
            completed: habit
                .completions()
                .iter()
                .any(|c| calendar.day_key(c.date) == day),
        })
        .collect()
}

fn trailing_days(days: u32, now: DateTime<Utc>, calendar: &Calendar) -> impl Iterator<Item = DayKey> {
    let today = calendar.day_key(now);
    (0..i64::from(days)).rev().map(move |ago| today.offset(-ago))
}
