//! CLI subcommand implementations.

pub mod activity;
pub mod calendar;
pub mod stats;
pub mod status;
pub mod util;
