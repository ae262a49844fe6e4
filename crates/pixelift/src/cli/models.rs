//! The `pixelift models` command for model inspection.

use clap::{Args, Subcommand};
use pixelift_core::{Config, SrEngine};

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Show the expected model location and whether it is installed
    Status,
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Status => {
            let config = Config::load()?;
            let model_path = SrEngine::model_path(&config.sr, &config.model_dir());
            let installed = SrEngine::model_exists(&config.sr, &config.model_dir());

            println!("Algorithm:  {}", config.sr.algorithm);
            println!("Scale:      {}x", config.sr.scale);
            println!("Model path: {}", model_path.display());
            println!(
                "Installed:  {}",
                if installed { "yes" } else { "no" }
            );

            if !installed {
                println!(
                    "\nPlace an ONNX export of {} (x{}) at the path above, \
                     or point general.model_dir elsewhere in the config.",
                    config.sr.algorithm, config.sr.scale
                );
            }
        }
    }

    Ok(())
}
