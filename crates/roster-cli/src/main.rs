//! Roster CLI
//!
//! Loads a pipe-delimited personnel file into a document store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod local_db;

/// Roster - personnel file ETL
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file or project directory
    #[arg(short, long, default_value = "roster.yaml", env = "ROSTER_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Roster project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Check configuration and transform the source without loading
    Validate {
        /// Read this file instead of the configured source
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Extract, transform, and load
    Run {
        /// Read this file instead of the configured source
        #[arg(short, long)]
        input: Option<String>,

        /// Skip records that fail validation instead of aborting
        #[arg(long)]
        skip_invalid: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Validate { input } => {
            commands::validate::run(&cli.config, input.as_deref()).await?;
        }
        Commands::Run {
            input,
            skip_invalid,
        } => {
            commands::run::run(&cli.config, input.as_deref(), skip_invalid).await?;
        }
    }

    Ok(())
}
