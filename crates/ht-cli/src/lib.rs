//! Habit tracker CLI library.
//!
//! This crate provides the CLI interface for the habit tracker.

mod cli;
pub mod commands;
mod config;
mod snapshot;

pub use cli::{Cli, Commands};
pub use config::{Config, WeekStart};
pub use snapshot::Snapshot;
