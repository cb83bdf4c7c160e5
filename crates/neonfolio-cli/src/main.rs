use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neonfolio_core::AppConfig;

mod commands;

const LOG_FILE: &str = "neonfolio.log";

#[derive(Parser)]
#[command(name = "neonfolio")]
#[command(author, version, about = "Preview and replay the neon portfolio page behaviors")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal preview (default)
    Preview,
    /// Replay a scenario file and print the mutation log
    Replay {
        /// Scenario file (.toml or .json)
        file: PathBuf,
        /// Drive the page with real sleeps instead of the virtual clock
        #[arg(long)]
        realtime: bool,
        /// Print one JSON object per mutation
        #[arg(long)]
        json: bool,
        /// Seed for the title glitch, overriding the config
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replay the built-in scroll-through of the demo page
    Demo {
        /// Stop the replay at this virtual time
        #[arg(long)]
        until_ms: Option<u64>,
        /// Print one JSON object per mutation
        #[arg(long)]
        json: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    let interactive = matches!(cli.command, None | Some(Commands::Preview));
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Preview) | None => commands::preview::run(config),
        Some(Commands::Replay {
            file,
            realtime,
            json,
            seed,
        }) => {
            let mut config = config;
            if seed.is_some() {
                config.glitch.seed = seed;
            }
            if realtime {
                commands::replay::run_realtime(&file, config, json).await
            } else {
                commands::replay::run(&file, config, json)
            }
        }
        Some(Commands::Demo { until_ms, json }) => commands::demo::run(config, until_ms, json),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { force } => commands::config::init(force),
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}

/// Install the tracing subscriber.
/// The preview owns the terminal, so its logs go to a file in the data dir.
fn init_logging(config: &AppConfig, interactive: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if interactive {
        let data_dir = config.data_dir();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating {}", data_dir.display()))?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(data_dir.join(LOG_FILE))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
