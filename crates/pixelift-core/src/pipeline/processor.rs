//! Pipeline orchestration - wires together all processing stages.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::PipelineError;
use crate::sr::SrEngine;
use crate::types::{FileReport, StepKind, StepStatus};

use super::convert::JpegNormalizer;
use super::discovery::DirectoryScanner;
use super::downscale::Downscaler;
use super::probe::DimensionProbe;
use super::upscale::Upscaler;

/// The main pipeline that prepares every image in a directory.
///
/// Each file goes through a fixed sequence: probe, conditional upscale,
/// re-probe, conditional downscale to the minimum height, conditional JPEG
/// normalization. A step's failure is benign; the file is left in whatever
/// state the last successful step produced and processing moves on.
pub struct ImagePipeline {
    config: Config,
    scanner: DirectoryScanner,
    downscaler: Downscaler,
    normalizer: JpegNormalizer,
    upscaler: Option<Upscaler>,
}

impl ImagePipeline {
    /// Create a pipeline with the given configuration.
    ///
    /// The super-resolution model is not loaded here; call [`load_sr`]
    /// before processing if upscaling is wanted.
    ///
    /// [`load_sr`]: ImagePipeline::load_sr
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            scanner: DirectoryScanner::new(&config.processing.valid_extensions),
            downscaler: Downscaler::new(config.limits.clone(), config.processing.jpeg_quality),
            normalizer: JpegNormalizer::new(config.limits.clone(), config.processing.jpeg_quality),
            upscaler: None,
        }
    }

    /// Load the super-resolution model configured in `config`.
    ///
    /// Load failure is fatal to the run; the caller decides whether to
    /// abort or proceed without upscaling.
    pub fn load_sr(&mut self, config: &Config) -> Result<(), PipelineError> {
        let engine = SrEngine::load(&config.sr, &config.model_dir())?;
        self.upscaler = Some(Upscaler::new(
            Arc::new(engine),
            config.limits.clone(),
            config.processing.jpeg_quality,
        ));
        Ok(())
    }

    /// Whether a super-resolution model is loaded.
    pub fn has_sr(&self) -> bool {
        self.upscaler.is_some()
    }

    /// Discover candidate image files in `dir`.
    ///
    /// Returns `NotADirectory` (fatal) if `dir` is not an existing
    /// directory; no file is touched in that case.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        self.scanner.scan(dir)
    }

    /// Process a single file through the full sequence.
    ///
    /// Returns `Err` only when a dimension probe fails, which means the
    /// file is skipped entirely; every other failure is recorded in the
    /// report and processing of the file continues.
    pub async fn process(&self, path: &Path) -> Result<FileReport, PipelineError> {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", path);

        let min_height = self.config.processing.min_height;

        // Phase 1: probe
        let (width, height) = DimensionProbe::probe(path)?;
        let mut report = FileReport::new(path, width, height);
        tracing::trace!("  Probe: {}x{}", width, height);

        // Phase 2: conditional upscale (strictly below the minimum)
        if height < min_height {
            self.run_upscale(path, &mut report).await;
        } else {
            report.record(StepKind::Upscale, StepStatus::Skipped, None);
        }

        // Phase 3: re-probe; the upscale may have changed the dimensions
        let (_, height) = DimensionProbe::probe(path)?;

        // Phase 4: conditional downscale (strictly above the minimum)
        if height > min_height {
            match self
                .downscaler
                .resize_to_height(path, path, min_height)
                .await
            {
                Ok((w, h)) => {
                    tracing::info!("Resized image: {:?} to {}x{}", path, w, h);
                    report.record(StepKind::Downscale, StepStatus::Completed, None);
                }
                Err(e) => {
                    tracing::warn!("Failed to resize image: {:?}: {}", path, e);
                    report.record(StepKind::Downscale, StepStatus::Failed, Some(e.to_string()));
                }
            }
        } else {
            report.record(StepKind::Downscale, StepStatus::Skipped, None);
        }

        // Phase 5: conditional JPEG normalization, keyed off the extension
        // of the original path, never the content
        if self.needs_normalize(path) {
            let dest = path.with_extension("jpg");
            match self.normalizer.normalize(path, &dest).await {
                Ok(()) => {
                    tracing::info!("Converted image: {:?} -> {:?}", path, dest);
                    report.record(StepKind::Normalize, StepStatus::Completed, None);
                    report.final_path = dest.clone();
                    if dest != path {
                        // The JPEG replaced the source under a new name;
                        // drop the stale original.
                        if let Err(e) = std::fs::remove_file(path) {
                            tracing::warn!("Failed to remove {:?}: {}", path, e);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to convert image: {:?}: {}", path, e);
                    report.record(StepKind::Normalize, StepStatus::Failed, Some(e.to_string()));
                }
            }
        } else {
            report.record(StepKind::Normalize, StepStatus::Skipped, None);
        }

        if let Ok((w, h)) = DimensionProbe::probe(&report.final_path) {
            report.final_width = Some(w);
            report.final_height = Some(h);
        }

        tracing::debug!("Processed {:?} in {:?}", path, start.elapsed());
        Ok(report)
    }

    /// Run the upscale phase, recording the outcome.
    async fn run_upscale(&self, path: &Path, report: &mut FileReport) {
        match &self.upscaler {
            Some(upscaler) => match upscaler.upscale(path, path).await {
                Ok(()) => {
                    tracing::info!("Upscaled image: {:?}", path);
                    report.record(StepKind::Upscale, StepStatus::Completed, None);
                }
                Err(e) => {
                    tracing::warn!("Failed to upscale image: {:?}: {}", path, e);
                    report.record(StepKind::Upscale, StepStatus::Failed, Some(e.to_string()));
                }
            },
            None => {
                tracing::warn!(
                    "Image below minimum height but no SR model loaded: {:?}",
                    path
                );
                report.record(
                    StepKind::Upscale,
                    StepStatus::Failed,
                    Some("no super-resolution model loaded".to_string()),
                );
            }
        }
    }

    /// Whether the file's extension triggers JPEG normalization.
    fn needs_normalize(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .processing
                    .normalize_extensions
                    .iter()
                    .any(|e| *e == ext_lower)
            })
            .unwrap_or(false)
    }
}
