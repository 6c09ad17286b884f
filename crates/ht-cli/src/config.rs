//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ht_core::{Calendar, CalendarError, DEFAULT_WINDOW_DAYS};
use serde::{Deserialize, Serialize};

/// First day of the week for "this week" counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the habit snapshot exported by the record store.
    pub snapshot_path: PathBuf,

    /// IANA timezone for day boundaries. System zone when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Trailing window for completion rates, in days.
    pub window_days: u32,

    pub week_start: WeekStart,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("snapshot_path", &self.snapshot_path)
            .field("timezone", &self.timezone)
            .field("window_days", &self.window_days)
            .field("week_start", &self.week_start)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            snapshot_path: data_dir.join("habits.json"),
            timezone: None,
            window_days: DEFAULT_WINDOW_DAYS,
            week_start: WeekStart::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default locations, then `config_path` if given.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment variables (HT_*)
        figment = figment.merge(Env::prefixed("HT_"));

        figment.extract()
    }

    /// Builds the calendar, preferring `tz_override` over the configured zone.
    pub fn calendar(&self, tz_override: Option<&str>) -> Result<Calendar, CalendarError> {
        let calendar = match tz_override.or(self.timezone.as_deref()) {
            Some(name) => Calendar::from_name(name)?,
            None => Calendar::local(),
        };
        Ok(calendar.with_week_start(self.week_start.weekday()))
    }
}

/// Returns the platform-specific config directory for ht.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ht"))
}

/// Returns the platform-specific data directory for ht.
///
/// On Linux: `~/.local/share/ht`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ht"))
}
