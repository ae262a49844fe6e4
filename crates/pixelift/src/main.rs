//! pixelift CLI - Batch image preparation.
//!
//! pixelift processes a directory of images in place: images below the
//! minimum height are upscaled through a super-resolution model, images
//! above it are downscaled to exactly that height, and PNGs are normalized
//! to JPEG.
//!
//! # Usage
//!
//! ```bash
//! # Process a directory in place
//! pixelift process ./images/
//!
//! # Override the height threshold and JPEG quality
//! pixelift process ./images/ --min-height 600 --quality 85
//!
//! # Check the super-resolution model
//! pixelift models status
//!
//! # View configuration
//! pixelift config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// pixelift - Batch image preparation: upscale, downscale, normalize.
#[derive(Parser, Debug)]
#[command(name = "pixelift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a directory of images in place
    Process(cli::process::ProcessArgs),

    /// Inspect the super-resolution model installation
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pixelift_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixelift config path`."
            );
            pixelift_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("pixelift v{}", pixelift_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Process(args) => cli::process::execute(args).await,
        Commands::Models(args) => cli::models::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
