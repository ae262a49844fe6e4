//! pixelift Core - Batch image preparation library.
//!
//! pixelift prepares a directory of images for publication: images below the
//! minimum height are upscaled through a super-resolution model, images
//! above it are downscaled to exactly that height, and PNG payloads are
//! normalized to JPEG. Files are modified in place (atomically, via temp
//! file + rename).
//!
//! # Architecture
//!
//! ```text
//! Directory → Scan → Probe → Upscale? → Re-probe → Downscale? → Normalize?
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixelift_core::{Config, ImagePipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mut pipeline = ImagePipeline::new(&config);
//!     pipeline.load_sr(&config)?;
//!
//!     for path in pipeline.scan("./images".as_ref())? {
//!         match pipeline.process(&path).await {
//!             Ok(report) => println!("{:?}", report),
//!             Err(e) => eprintln!("skipped {:?}: {e}", path),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod sr;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, PixeliftError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{DimensionProbe, DirectoryScanner, ImagePipeline};
pub use sr::SrEngine;
pub use types::{FileReport, StepKind, StepRecord, StepStatus};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
