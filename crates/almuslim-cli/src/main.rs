//! Almuslim terminal front-end.
//!
//! Shows today's prayer times and Hijri date for the configured city, then
//! drops into an interactive prompt.
//!
//! # Usage
//!
//! ```bash
//! almuslim                      # today's screen + interactive prompt
//! almuslim --setup              # rerun the setup wizard
//! almuslim --week --no-repl     # print a week and exit
//! almuslim --week-csv week.csv  # export the week as CSV
//! ```
//!
//! # Environment Variables
//!
//! - `ALMUSLIM_CONFIG`: configuration file (default: ~/.al-muslim/config.toml)
//! - `RUST_LOG`: log filter (default: warn)

mod app;
mod cities;
mod config;
mod onboarding;
mod prompt;
mod repl;
mod timezone;
mod ui;

use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::ConfigStore;
use crate::prompt::Prompt;

#[derive(Parser, Debug)]
#[command(name = "almuslim", version, about = "Fast terminal prayer times")]
struct Args {
    /// Run the setup wizard
    #[arg(long)]
    setup: bool,
    /// Ask for a city before showing times
    #[arg(long)]
    ask: bool,
    /// Also show the next 7 days
    #[arg(long)]
    week: bool,
    /// Write the next 7 days to a CSV file
    #[arg(long, value_name = "PATH")]
    week_csv: Option<PathBuf>,
    /// Detect the location from the public IP address
    #[arg(long)]
    detect_location: bool,
    /// Configuration file (overrides ALMUSLIM_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding cities.csv and the Hijri table
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    /// Show this date instead of today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,
    /// Print once and exit
    #[arg(long)]
    no_repl: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let store = ConfigStore::new(args.config.clone().unwrap_or_else(config::default_config_path));
    let data_dir = app::resolve_data_dir(args.data_dir.clone());
    let mut app = App::new(store, data_dir, args.date)?;
    tracing::info!(config = %app.store().path().display(), "starting almuslim");

    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());
    let interactive = !args.no_repl;

    if args.setup || (interactive && !app.store().exists()) {
        onboarding::run(&mut app, &mut prompt)?;
    }
    if args.detect_location {
        repl::detect(&mut app, &mut prompt)?;
    }
    if interactive && (args.ask || app.config().ask_on_start()) {
        repl::ask(&mut app, &mut prompt)?;
    }

    prompt.say(&app.render())?;
    if args.week || args.week_csv.is_some() {
        prompt.say(&app.render_week())?;
    }
    if let Some(path) = &args.week_csv {
        app.export_week_csv(path)?;
        prompt.say(&format!("CSV written to: {}\n", path.display()))?;
    }

    if interactive {
        repl::run(&mut app, &mut prompt)?;
    }
    Ok(())
}
