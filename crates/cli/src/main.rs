//! tubecap CLI
//!
//! Main entry point for the tubecap command-line tool.
//! Turns a video's captions into timestamped chunks for retrieval.

mod commands;

use clap::{Parser, Subcommand};
use commands::{LoadCommand, TracksCommand};
use std::path::PathBuf;
use tubecap_core::{config::AppConfig, logging, AppResult};

/// tubecap - chunk video captions into timestamped documents
#[derive(Parser, Debug)]
#[command(name = "tubecap")]
#[command(about = "Chunk video captions into timestamped documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "TUBECAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk a video's captions and print the documents
    Load(LoadCommand),

    /// List a video's caption tracks
    Tracks(TracksCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.log_level, cli.verbose, cli.no_color);

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("tubecap starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Chunk width: {}s", config.chunk_seconds);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Load(_) => "load",
        Commands::Tracks(_) => "tracks",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Load(cmd) => cmd.execute(&config).await,
        Commands::Tracks(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
