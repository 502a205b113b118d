use chrono::Local;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use recurd::config::Config;
use recurd::store::{DueStore, ObligationStore};
use recurd::worker::{self, ShutdownFlag, run_pass};

fn setup_logging(cli: &Cli, config: &Config) {
    let default_level = if cli.is_verbose() {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };

    // RUST_LOG still wins over config
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

async fn run_worker(config: &Config) -> Result<()> {
    let store = ObligationStore::open(&config.database)
        .with_context(|| format!("Failed to open store at {}", config.database.display()))?;

    let shutdown = ShutdownFlag::new();
    let signal_task =
        worker::shutdown::listen_for_signals(shutdown.clone()).context("Failed to register signal handlers")?;

    let state = worker::run(store, config.poll_interval(), shutdown).await;
    signal_task.abort();

    println!(
        "{} {} passes, {} processed, {} failed",
        "Stopped:".cyan(),
        state.pass_count,
        state.total_processed,
        state.total_failed
    );
    Ok(())
}

fn run_once(config: &Config) -> Result<()> {
    let mut store = ObligationStore::open(&config.database)
        .with_context(|| format!("Failed to open store at {}", config.database.display()))?;

    let summary = run_pass(&mut store, Local::now().date_naive());
    if summary.selector_failed {
        println!("{}", "Pass skipped: selector failed (see log)".red());
    } else {
        println!(
            "{} {} selected, {} processed, {} failed",
            "Pass complete:".green(),
            summary.selected,
            summary.processed,
            summary.failed
        );
    }
    Ok(())
}

fn list_due(config: &Config) -> Result<()> {
    let store = ObligationStore::open(&config.database)
        .with_context(|| format!("Failed to open store at {}", config.database.display()))?;

    let today = Local::now().date_naive();
    let due = store.select_due(today).context("Failed to query due obligations")?;

    if due.is_empty() {
        println!("{}", format!("Nothing due as of {today}").yellow());
    } else {
        println!("{} {}", "Due as of".green(), today);
        for id in due {
            println!("  {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&cli, &config);
    info!("Starting with config from: {:?}", cli.config);

    match cli.command {
        // Default: run the worker
        None | Some(Commands::Run) => run_worker(&config).await,
        Some(Commands::Once) => run_once(&config),
        Some(Commands::Due) => list_due(&config),
    }
}
