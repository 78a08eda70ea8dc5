use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tastebud::{cli, config};

#[derive(Parser)]
#[command(
    name = "tastebud",
    version,
    about = "Embed restaurant reviews into a local vector collection"
)]
struct Cli {
    /// Settings file (defaults to ./tastebud.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load, clean, embed, and store the dataset (the default)
    Ingest {
        /// Dataset file, overriding the configured path
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Show stored collections and entry counts
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::TastebudConfig::load_from(path)?,
        None => config::TastebudConfig::load()?,
    };

    // Log to stderr so stdout carries only the command's report.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &config.source {
        Some(path) => tracing::info!(path = %path.display(), "settings loaded"),
        None => tracing::info!("no settings file found, using defaults"),
    }

    match cli.command.unwrap_or(Command::Ingest { dataset: None }) {
        Command::Ingest { dataset } => {
            cli::ingest::ingest(&config, dataset.as_deref()).await?;
        }
        Command::Stats => {
            cli::stats::stats(&config)?;
        }
    }

    Ok(())
}
