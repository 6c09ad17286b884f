//! Habits and their completion records.
//!
//! A [`Habit`] exclusively owns its [`Completion`]s. Completions carry no
//! back-reference; the owning habit answers "which habit is this for".

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, DayKey, Timestamped};
use crate::types::{CompletionId, HabitColor, HabitId, HabitName, ValidationError};
use crate::{adherence, streak};

/// Weekdays a weekly habit targets, 0 = Sunday through 6 = Saturday.
///
/// Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct TargetDays(BTreeSet<u8>);

impl TargetDays {
    /// Validates a set of weekday indices.
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self, ValidationError> {
        let days: BTreeSet<u8> = days.into_iter().collect();
        if days.is_empty() {
            return Err(ValidationError::NoTargetDays);
        }
        if let Some(&value) = days.iter().find(|&&d| d > 6) {
            return Err(ValidationError::WeekdayOutOfRange { value });
        }
        Ok(Self(days))
    }

    /// Whether the given weekday index is targeted.
    pub fn contains(&self, weekday: u8) -> bool {
        self.0.contains(&weekday)
    }

    /// Targeted weekday indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<u8>> for TargetDays {
    type Error = ValidationError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetDays> for Vec<u8> {
    fn from(days: TargetDays) -> Self {
        days.0.into_iter().collect()
    }
}

/// How often a habit is meant to be done.
///
/// Streak and adherence math ignore this; it only drives scheduling hints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    /// Every day.
    #[default]
    Daily,
    /// Specific weekdays only.
    Weekly { target_days: TargetDays },
}

impl Frequency {
    /// Whether the habit is scheduled on the given day.
    pub fn is_scheduled_on(&self, day: DayKey) -> bool {
        match self {
            Self::Daily => true,
            Self::Weekly { target_days } => target_days.contains(day.weekday_index()),
        }
    }
}

/// A single "done" mark for a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: CompletionId,
    /// When the habit was marked done. May be backdated.
    pub date: DateTime<Utc>,
}

impl Completion {
    /// Creates a completion with a fresh ID.
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            id: CompletionId::generate(),
            date,
        }
    }
}

impl Timestamped for Completion {
    fn instant(&self) -> DateTime<Utc> {
        self.date
    }
}

/// A recurring habit and its completion history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub name: HabitName,
    /// Icon tag, opaque to the engine.
    pub icon: String,
    #[serde(default)]
    pub color: HabitColor,
    #[serde(default)]
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
    /// Completions in insertion order.
    #[serde(default)]
    completions: Vec<Completion>,
}

impl Habit {
    /// Creates a habit with a fresh ID and no completions.
    pub fn new(
        name: impl AsRef<str>,
        icon: impl Into<String>,
        color: HabitColor,
        frequency: Frequency,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: HabitId::generate(),
            name: HabitName::new(name)?,
            icon: icon.into(),
            color,
            frequency,
            created_at,
            completions: Vec::new(),
        })
    }

    /// Completions in insertion order.
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Renames the habit. Surrounding whitespace is dropped.
    pub fn rename(&mut self, name: impl AsRef<str>) -> Result<(), ValidationError> {
        self.name = HabitName::new(name)?;
        Ok(())
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = icon.into();
    }

    pub const fn set_color(&mut self, color: HabitColor) {
        self.color = color;
    }

    /// Appends a completion at the given instant.
    ///
    /// Does not check for an existing completion on the same day.
    pub fn record_completion(&mut self, at: DateTime<Utc>) -> &Completion {
        self.completions.push(Completion::new(at));
        &self.completions[self.completions.len() - 1]
    }

    /// Removes the first completion on `day`, returning it.
    pub fn remove_completion_on(&mut self, day: DayKey, calendar: &Calendar) -> Option<Completion> {
        let index = self
            .completions
            .iter()
            .position(|c| calendar.day_key(c.date) == day)?;
        Some(self.completions.remove(index))
    }

    /// Marks today done, or un-marks it if it already is.
    ///
    /// Un-marking removes only the first completion of today, so a habit
    /// logged twice today stays completed. Returns whether the habit is
    /// completed today afterwards.
    pub fn toggle_today(&mut self, now: DateTime<Utc>, calendar: &Calendar) -> bool {
        if self.is_completed_today(now, calendar) {
            let removed = self.remove_completion_on(calendar.day_key(now), calendar);
            let still_done = self.is_completed_today(now, calendar);
            tracing::debug!(habit = %self.id, ?removed, still_done, "unmarked today");
            still_done
        } else {
            self.record_completion(now);
            tracing::debug!(habit = %self.id, "marked today");
            true
        }
    }

    /// See [`streak::is_completed_today`].
    pub fn is_completed_today(&self, now: DateTime<Utc>, calendar: &Calendar) -> bool {
        streak::is_completed_today(&self.completions, now, calendar)
    }

    /// See [`streak::current_streak`].
    pub fn current_streak(&self, now: DateTime<Utc>, calendar: &Calendar) -> u32 {
        streak::current_streak(&self.completions, now, calendar)
    }

    /// See [`streak::best_streak`].
    pub fn best_streak(&self, calendar: &Calendar) -> u32 {
        streak::best_streak(&self.completions, calendar)
    }

    /// See [`adherence::completion_rate`].
    pub fn completion_rate(&self, window_days: u32, now: DateTime<Utc>, calendar: &Calendar) -> f64 {
        adherence::completion_rate(&self.completions, window_days, now, calendar)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn habit() -> Habit {
        Habit::new(
            "Read",
            "book.fill",
            HabitColor::Green,
            Frequency::Daily,
            at("2025-01-01T08:00:00Z"),
        )
        .unwrap()
    }

    #[test]
    fn new_habit_has_no_completions() {
        let h = habit();
        assert!(h.completions().is_empty());
        assert_eq!(h.frequency, Frequency::Daily);
    }

    #[test]
    fn new_habit_rejects_blank_name() {
        let err = Habit::new("  ", "x", HabitColor::Blue, Frequency::Daily, Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "habit name" });
    }

    #[test]
    fn target_days_validation() {
        assert_eq!(TargetDays::new([]).unwrap_err(), ValidationError::NoTargetDays);
        assert_eq!(
            TargetDays::new([1, 7]).unwrap_err(),
            ValidationError::WeekdayOutOfRange { value: 7 }
        );
        let days = TargetDays::new([5, 1, 1, 3]).unwrap();
        assert_eq!(days.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn weekly_frequency_serde_shape() {
        let freq = Frequency::Weekly {
            target_days: TargetDays::new([1, 3]).unwrap(),
        };
        let json = serde_json::to_string(&freq).unwrap();
        assert_eq!(json, r#"{"kind":"weekly","target_days":[1,3]}"#);

        let daily: Frequency = serde_json::from_str(r#"{"kind":"daily"}"#).unwrap();
        assert_eq!(daily, Frequency::Daily);
    }

    #[test]
    fn weekly_frequency_rejects_empty_days() {
        let result: Result<Frequency, _> =
            serde_json::from_str(r#"{"kind":"weekly","target_days":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let result: Result<Frequency, _> = serde_json::from_str(r#"{"kind":"monthly"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn is_scheduled_on_weekly_days() {
        let freq = Frequency::Weekly {
            target_days: TargetDays::new([1, 3]).unwrap(),
        };
        let monday = DayKey::from_date(NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        let tuesday = monday.offset(1);
        assert!(freq.is_scheduled_on(monday));
        assert!(!freq.is_scheduled_on(tuesday));
        assert!(Frequency::Daily.is_scheduled_on(tuesday));
    }

    #[test]
    fn toggle_today_marks_then_unmarks() {
        let cal = Calendar::utc();
        let now = at("2025-02-10T09:00:00Z");
        let mut h = habit();
        h.record_completion(at("2025-02-09T21:00:00Z"));

        assert!(h.toggle_today(now, &cal));
        assert!(h.is_completed_today(now, &cal));
        assert_eq!(h.completions().len(), 2);

        assert!(!h.toggle_today(now, &cal));
        assert!(!h.is_completed_today(now, &cal));
        // Yesterday's completion is untouched
        assert_eq!(h.completions().len(), 1);
        assert_eq!(h.completions()[0].date, at("2025-02-09T21:00:00Z"));
    }

    #[test]
    fn toggle_today_with_duplicate_completions_stays_completed() {
        let cal = Calendar::utc();
        let now = at("2025-02-10T22:00:00Z");
        let mut h = habit();
        h.record_completion(at("2025-02-10T08:00:00Z"));
        h.record_completion(at("2025-02-10T20:00:00Z"));

        assert!(h.toggle_today(now, &cal));
        assert!(h.is_completed_today(now, &cal));
        assert_eq!(h.completions().len(), 1);
        assert_eq!(h.completions()[0].date, at("2025-02-10T20:00:00Z"));

        assert!(!h.toggle_today(now, &cal));
        assert!(h.completions().is_empty());
    }

    #[test]
    fn remove_completion_on_removes_only_first_duplicate() {
        let cal = Calendar::utc();
        let mut h = habit();
        h.record_completion(at("2025-02-10T08:00:00Z"));
        h.record_completion(at("2025-02-10T20:00:00Z"));

        let day = cal.day_key(at("2025-02-10T12:00:00Z"));
        let removed = h.remove_completion_on(day, &cal).unwrap();
        assert_eq!(removed.date, at("2025-02-10T08:00:00Z"));
        assert_eq!(h.completions().len(), 1);
        assert!(h.remove_completion_on(day.pred(), &cal).is_none());
    }

    #[test]
    fn rename_and_edit_display_fields() {
        let mut h = habit();
        h.rename("Read 20 pages").unwrap();
        h.set_icon("books.vertical");
        h.set_color(HabitColor::Orange);
        assert_eq!(h.name, "Read 20 pages");
        assert_eq!(h.icon, "books.vertical");
        assert_eq!(h.color, HabitColor::Orange);
        assert!(h.rename("").is_err());
        assert_eq!(h.name, "Read 20 pages");
    }

    #[test]
    fn names_are_trimmed() {
        let mut h = Habit::new(" Meditate\n", "leaf", HabitColor::Teal, Frequency::Daily, Utc::now()).unwrap();
        assert_eq!(h.name, "Meditate");
        h.rename("  Meditate 10 min  ").unwrap();
        assert_eq!(h.name, "Meditate 10 min");
    }

    #[test]
    fn blank_name_is_rejected_on_deserialize() {
        let json = r#"{
            "id": "h1",
            "name": "  ",
            "icon": "x",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let err = serde_json::from_str::<Habit>(json).unwrap_err();
        assert!(err.to_string().contains("habit name cannot be empty"));
    }

    #[test]
    fn habit_serde_roundtrip() {
        let mut h = habit();
        h.record_completion(at("2025-02-10T08:00:00Z"));
        let json = serde_json::to_string(&h).unwrap();
        let parsed: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn habit_deserializes_with_defaults() {
        let json = r#"{
            "id": "h1",
            "name": "Stretch",
            "icon": "figure.walk",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let h: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(h.color, HabitColor::Blue);
        assert_eq!(h.frequency, Frequency::Daily);
        assert!(h.completions().is_empty());
    }
}
