//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Upper bound for `--days`, roughly ten years.
pub const MAX_DAYS: u32 = 3660;

/// Habit tracker.
///
/// Reads a habit snapshot and reports streaks and adherence.
#[derive(Debug, Parser)]
#[command(name = "ht", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Habit snapshot file (overrides the configured path).
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Reference time: ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 days ago').
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// IANA timezone for day boundaries (e.g., Europe/Berlin).
    #[arg(long, global = true)]
    pub tz: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show today's checklist and current streaks.
    Status,

    /// Show streak and completion statistics.
    Stats {
        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Completion rate window in days (overrides config).
        #[arg(long)]
        window: Option<u32>,
    },

    /// Show which recent days a habit was completed.
    Calendar {
        /// Habit name or ID.
        habit: String,

        /// Number of days to show, ending today.
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAYS)))]
        days: u32,
    },

    /// Show completions per day across all habits.
    Activity {
        /// Number of days to show, ending today.
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAYS)))]
        days: u32,
    },
}
