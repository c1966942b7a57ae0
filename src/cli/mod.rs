pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "kdrama-api")]
#[command(about = "Korean drama catalog API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Load this catalog fixture into the store before serving")]
        seed: Option<PathBuf>,
    },

    #[command(about = "Load genres and dramas from a JSON fixture into the store")]
    Seed {
        #[arg(help = "Fixture file with \"genres\" and \"dramas\" arrays")]
        path: PathBuf,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    tracing::info!("Starting in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { seed: None }) {
        Commands::Serve { seed } => commands::serve::handle(config, seed).await,
        Commands::Seed { path } => commands::seed::handle(config, path).await,
    }
}
