//! Super-resolution upscaling.
//!
//! This module wraps a fixed-factor neural upscaler (FSRCNN by default)
//! running locally via ONNX Runtime. The model is loaded once per run and
//! shared read-only across all upscale calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixelift_core::sr::SrEngine;
//! use pixelift_core::Config;
//!
//! let config = Config::default();
//! let engine = SrEngine::load(&config.sr, &config.model_dir())?;
//! let upscaled = engine.upscale(&image, path)?;
//! ```

pub(crate) mod preprocess;
pub(crate) mod session;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::SrConfig;
use crate::error::PipelineError;

use self::preprocess::{image_to_tensor, tensor_to_image};
use self::session::SrSession;

/// Engine for super-resolution upscaling.
#[derive(Debug)]
pub struct SrEngine {
    session: SrSession,
    scale: u32,
}

impl SrEngine {
    /// Load the super-resolution model from the model directory.
    ///
    /// Expects the ONNX model at `{model_dir}/{algorithm}_x{scale}.onnx`,
    /// e.g. `fsrcnn_x2.onnx`.
    pub fn load(config: &SrConfig, model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = Self::model_path(config, model_dir);

        if !model_path.exists() {
            return Err(PipelineError::ModelLoad {
                path: model_path,
                message: "Model not found. Place the ONNX model in the model directory \
                          (see `pixelift models status`)."
                    .to_string(),
            });
        }

        tracing::info!("Loading SR model from {:?}", model_path);
        let session = SrSession::load(&model_path)?;
        tracing::info!("SR model loaded successfully ({}x)", config.scale);

        Ok(Self {
            session,
            scale: config.scale,
        })
    }

    /// The fixed upscale factor this engine was configured with.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Upscale an image by the engine's fixed factor.
    pub fn upscale(
        &self,
        image: &DynamicImage,
        path: &Path,
    ) -> Result<DynamicImage, PipelineError> {
        let tensor = image_to_tensor(image);
        let (shape, data) = self.session.run(&tensor, path)?;
        let upscaled = tensor_to_image(&shape, &data, path)?;

        let expected = (image.width() * self.scale, image.height() * self.scale);
        if (upscaled.width(), upscaled.height()) != expected {
            tracing::warn!(
                "SR output for {:?} is {}x{}, expected {}x{} for scale {}",
                path,
                upscaled.width(),
                upscaled.height(),
                expected.0,
                expected.1,
                self.scale
            );
        }

        Ok(upscaled)
    }

    /// Check whether the model file exists on disk.
    pub fn model_exists(config: &SrConfig, model_dir: &Path) -> bool {
        Self::model_path(config, model_dir).exists()
    }

    /// Get the expected model file path.
    pub fn model_path(config: &SrConfig, model_dir: &Path) -> PathBuf {
        model_dir.join(format!("{}_x{}.onnx", config.algorithm, config.scale))
    }
}
