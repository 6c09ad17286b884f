use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ht_cli::commands::{activity, calendar, stats, status, util};
use ht_cli::{Cli, Commands, Config, Snapshot};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let cal = config
        .calendar(cli.tz.as_deref())
        .context("invalid timezone")?;

    // Sampled once; every computation below sees the same instant
    let wall_clock = Utc::now();
    let now = match cli.now.as_deref() {
        Some(s) => util::parse_datetime(s, wall_clock)?,
        None => wall_clock,
    };
    tracing::debug!(%now, tz = cal.timezone().name(), "reference time");

    let snapshot_path = cli.file.as_deref().unwrap_or(&config.snapshot_path);
    let snapshot = Snapshot::load(snapshot_path)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Status => {
            status::run(&mut out, &snapshot.habits, now, &cal, config.window_days)?;
        }
        Commands::Stats { json, window } => {
            let window_days = window.unwrap_or(config.window_days);
            stats::run(&mut out, &snapshot.habits, now, &cal, window_days, *json)?;
        }
        Commands::Calendar { habit, days } => {
            let habit = snapshot
                .find(habit)
                .with_context(|| format!("no habit named or identified by '{habit}'"))?;
            calendar::run(&mut out, habit, *days, now, &cal)?;
        }
        Commands::Activity { days } => {
            activity::run(&mut out, &snapshot.habits, *days, now, &cal)?;
        }
    }

    out.flush()?;
    Ok(())
}
