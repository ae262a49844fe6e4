//! Height-bounded, aspect-preserving downscale stage.

use std::path::Path;

use image::imageops::FilterType;
use tokio::task;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

use super::decode::decode_image;
use super::save;

/// Resampling filter for all downscales (bicubic).
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Downscales images to an exact target height.
pub struct Downscaler {
    limits: LimitsConfig,
    jpeg_quality: u8,
}

impl Downscaler {
    pub fn new(limits: LimitsConfig, jpeg_quality: u8) -> Self {
        Self {
            limits,
            jpeg_quality,
        }
    }

    /// Resize the image at `input` so its height is exactly `target_height`,
    /// preserving aspect ratio (new width = floor(W0 * target / H0), at
    /// least 1), and encode to `output`. Input and output may be the same
    /// path; the write replaces the target atomically.
    ///
    /// Calling this on an image shorter than `target_height` is caller
    /// misuse: returns `InputTooSmall` and performs no write.
    ///
    /// Returns the output dimensions.
    pub async fn resize_to_height(
        &self,
        input: &Path,
        output: &Path,
        target_height: u32,
    ) -> Result<(u32, u32), PipelineError> {
        let image = decode_image(input, self.limits.decode_timeout_ms).await?;
        let (width, height) = (image.width(), image.height());

        if height < target_height {
            return Err(PipelineError::InputTooSmall {
                path: input.to_path_buf(),
                height,
                target: target_height,
            });
        }

        let new_width =
            ((u64::from(width) * u64::from(target_height)) / u64::from(height)).max(1) as u32;

        let output = output.to_path_buf();
        let quality = self.jpeg_quality;
        task::spawn_blocking(move || {
            let resized = image.resize_exact(new_width, target_height, RESIZE_FILTER);
            save::write_atomic(&resized, &output, quality)
        })
        .await
        .map_err(|e| PipelineError::Encode {
            path: input.to_path_buf(),
            message: format!("Task join error: {}", e),
        })??;

        Ok((new_width, target_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::probe::DimensionProbe;
    use image::{DynamicImage, RgbImage};
    use std::path::PathBuf;

    fn downscaler() -> Downscaler {
        Downscaler::new(LimitsConfig::default(), 90)
    }

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .save(&path)
            .unwrap();
        path
    }

    #[tokio::test]
    async fn test_downscale_to_exact_height() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "tall.png", 800, 1600);

        let dims = downscaler()
            .resize_to_height(&path, &path, 400)
            .await
            .unwrap();
        assert_eq!(dims, (200, 400));
        assert_eq!(DimensionProbe::probe(&path).unwrap(), (200, 400));
    }

    #[tokio::test]
    async fn test_downscale_width_floors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "odd.png", 333, 1000);

        // floor(333 * 400 / 1000) = floor(133.2) = 133
        let dims = downscaler()
            .resize_to_height(&path, &path, 400)
            .await
            .unwrap();
        assert_eq!(dims, (133, 400));
    }

    #[tokio::test]
    async fn test_downscale_too_small_performs_no_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "short.png", 300, 200);
        let before = std::fs::read(&path).unwrap();

        let err = downscaler()
            .resize_to_height(&path, &path, 400)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputTooSmall { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_downscale_equal_height_rewrites_same_dims() {
        // Equal height is not misuse; the guard is strictly less-than.
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "even.png", 150, 400);

        let dims = downscaler()
            .resize_to_height(&path, &path, 400)
            .await
            .unwrap();
        assert_eq!(dims, (150, 400));
    }

    #[tokio::test]
    async fn test_downscale_extreme_aspect_clamps_width_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sliver.png", 2, 1000);

        // floor(2 * 100 / 1000) = 0, clamped to 1
        let dims = downscaler()
            .resize_to_height(&path, &path, 100)
            .await
            .unwrap();
        assert_eq!(dims, (1, 100));
    }

    #[tokio::test]
    async fn test_downscale_separate_output_leaves_input_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "in.png", 800, 1600);
        let output = dir.path().join("out.png");
        let before = std::fs::read(&input).unwrap();

        downscaler()
            .resize_to_height(&input, &output, 400)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&input).unwrap(), before);
        assert_eq!(DimensionProbe::probe(&output).unwrap(), (200, 400));
    }
}
