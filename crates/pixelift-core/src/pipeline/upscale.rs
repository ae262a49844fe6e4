//! Super-resolution upscale stage.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::sr::SrEngine;

use super::decode::decode_image;
use super::save;

/// Upscales images through the super-resolution engine.
pub struct Upscaler {
    engine: Arc<SrEngine>,
    limits: LimitsConfig,
    jpeg_quality: u8,
}

impl Upscaler {
    /// Create an upscaler around a loaded engine.
    pub fn new(engine: Arc<SrEngine>, limits: LimitsConfig, jpeg_quality: u8) -> Self {
        Self {
            engine,
            limits,
            jpeg_quality,
        }
    }

    /// The engine's fixed upscale factor.
    pub fn scale(&self) -> u32 {
        self.engine.scale()
    }

    /// Decode `input`, upscale it by the engine's fixed factor, and encode
    /// the result to `output`. Input and output may be the same path; the
    /// write replaces the target atomically.
    pub async fn upscale(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        let image = decode_image(input, self.limits.decode_timeout_ms).await?;
        let upscaled = self.infer(image, input).await?;

        let output = output.to_path_buf();
        let quality = self.jpeg_quality;
        tokio::task::spawn_blocking(move || save::write_atomic(&upscaled, &output, quality))
            .await
            .map_err(|e| PipelineError::Encode {
                path: input.to_path_buf(),
                message: format!("Task join error: {}", e),
            })?
    }

    /// Run inference under the configured timeout, off the async runtime.
    async fn infer(
        &self,
        image: DynamicImage,
        path: &Path,
    ) -> Result<DynamicImage, PipelineError> {
        let engine = Arc::clone(&self.engine);
        let path_owned = path.to_path_buf();
        let timeout_ms = self.limits.inference_timeout_ms;

        let result = timeout(Duration::from_millis(timeout_ms), async {
            tokio::task::spawn_blocking(move || engine.upscale(&image, &path_owned)).await
        })
        .await;

        match result {
            Ok(Ok(Ok(upscaled))) => Ok(upscaled),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Inference {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "inference".to_string(),
                timeout_ms,
            }),
        }
    }
}
