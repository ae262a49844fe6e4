//! JPEG normalization stage.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use tokio::task;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

use super::decode::decode_image;
use super::save;

/// Re-encodes images as JPEG at a configured quality.
pub struct JpegNormalizer {
    limits: LimitsConfig,
    quality: u8,
}

impl JpegNormalizer {
    pub fn new(limits: LimitsConfig, quality: u8) -> Self {
        Self { limits, quality }
    }

    /// Decode `input`, force the color model to 3-channel RGB, and encode
    /// as JPEG to `output`. Dropping alpha/palette is lossy and
    /// irreversible. Input and output may be the same path; the write
    /// replaces the target atomically.
    pub async fn normalize(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        let image = decode_image(input, self.limits.decode_timeout_ms).await?;

        let output = output.to_path_buf();
        let quality = self.quality;
        task::spawn_blocking(move || {
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            save::write_atomic_as(&rgb, &output, ImageFormat::Jpeg, quality)
        })
        .await
        .map_err(|e| PipelineError::Encode {
            path: input.to_path_buf(),
            message: format!("Task join error: {}", e),
        })?
    }
}
