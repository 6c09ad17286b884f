//! Core domain logic for the habit tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Calendar normalization: bucketing instants into local days
//! - Streaks: completed-today, current and best consecutive-day runs
//! - Adherence: completion rate over a trailing window
//! - Statistics: per-habit summaries and portfolio overviews
//!
//! All computations are pure. "Now" is always an argument, never sampled here.

pub mod adherence;
pub mod calendar;
pub mod habit;
pub mod stats;
pub mod streak;
pub mod types;

pub use adherence::{DEFAULT_WINDOW_DAYS, completion_rate, completions_this_week};
pub use calendar::{Calendar, CalendarError, DayKey, Timestamped, days_between};
pub use habit::{Completion, Frequency, Habit, TargetDays};
pub use stats::{CalendarDay, DayActivity, HabitSummary, Overview, daily_activity, habit_calendar};
pub use streak::{best_streak, current_streak, is_completed_today};
pub use types::{CompletionId, HabitColor, HabitId, HabitName, ValidationError};
