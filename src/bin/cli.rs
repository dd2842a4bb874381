//! Reel Poster CLI
//!
//! Meant to be invoked once per schedule tick (cron, systemd timer, CI).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reel_poster::{
    error::{AppError, Result},
    models::{Config, CursorState, LoggingConfig},
    pipeline::{self, RunOptions, RunReport},
    services::{DriveCatalog, GraphPublisher},
    storage::{LocalStateStore, StateLoad, StateStore},
    utils::http,
};

/// Reel Poster - Drive folder to Facebook Page scheduler
#[derive(Parser, Debug)]
#[command(
    name = "reel-poster",
    version,
    about = "Posts videos from a Drive folder to a Facebook Page"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "poster.toml")]
    config: PathBuf,

    /// Override the state file path
    #[arg(long)]
    state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select the next videos, commit the cursor and publish them
    Run {
        /// Show what would be posted without committing or publishing
        #[arg(long)]
        dry_run: bool,

        /// Post even if a run was already committed today
        #[arg(long)]
        force: bool,
    },

    /// Show the saved cursor state
    Status,

    /// Reset the cursor state to the beginning
    Reset,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loading does not log, so the level from the file can still be applied.
    let loaded = Config::load_optional(&cli.config);
    let level = match &loaded {
        Ok(Some(config)) => config.logging.level.clone(),
        _ => LoggingConfig::default().level,
    };
    init_logging(cli.verbose, &level);

    let mut config = match loaded {
        Ok(Some(config)) => {
            log::debug!("Loaded configuration from {}", cli.config.display());
            config
        }
        Ok(None) => {
            log::warn!(
                "Config file {} not found. Using defaults.",
                cli.config.display()
            );
            Config::default()
        }
        Err(e) => {
            log::error!("Config load failed from {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };
    config.apply_env();
    if let Some(path) = cli.state {
        config.state.path = path;
    }

    let store = LocalStateStore::new(&config.state.path);

    match cli.command {
        Command::Run { dry_run, force } => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let client = http::create_async_client(&config.http)?;
            let source = DriveCatalog::new(client.clone(), &config.drive);
            let publisher = GraphPublisher::new(client, &config.facebook);

            let options = RunOptions {
                today: pipeline::today_utc(),
                dry_run,
                force,
            };
            let report =
                pipeline::run_poster(&config, &source, &publisher, &store, options).await?;

            match &report {
                RunReport::Skipped { day } => log::info!("Nothing to do for {day}"),
                RunReport::Planned { chosen } => {
                    log::info!("Would post {} video(s)", chosen.len())
                }
                RunReport::Posted { outcomes } => {
                    let failures = report.failures();
                    log::info!(
                        "Posted {} of {} video(s)",
                        outcomes.len() - failures,
                        outcomes.len()
                    );
                    if failures > 0 {
                        log::warn!("The cursor has moved past the failed video(s)");
                        return Err(AppError::Incomplete {
                            failed: failures,
                            total: outcomes.len(),
                        });
                    }
                }
            }
        }

        Command::Status => {
            log::info!("State file: {}", store.path().display());
            let loaded = store.load();
            if let StateLoad::Recovered { reason, .. } = &loaded {
                log::info!("Using initial state ({reason})");
            }

            let state = loaded.state();
            log::info!("Strategy: {:?}", config.selection.strategy);
            log::info!("Cursor: {}", state.cursor);
            log::info!("Published this cycle: {}", state.published.len());
            match state.last_run_day {
                Some(day) => log::info!("Last run day: {day}"),
                None => log::info!("Last run day: never"),
            }
            if let Some(updated) = state.updated_at {
                log::info!("Last updated: {updated}");
            }
        }

        Command::Reset => {
            store.save(&CursorState::default())?;
            log::info!("State reset at {}", store.path().display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
