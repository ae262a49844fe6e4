//! Shared image decoding with content-based format detection and timeout.

use std::path::Path;
use std::time::Duration;

use image::DynamicImage;
use tokio::time::timeout;

use crate::error::PipelineError;

/// Decode an image file with a timeout, off the async runtime.
///
/// Format detection is content-based, so a JPEG payload under a `.png`
/// name still decodes.
pub(crate) async fn decode_image(
    path: &Path,
    timeout_ms: u64,
) -> Result<DynamicImage, PipelineError> {
    let path_owned = path.to_path_buf();
    let timeout_duration = Duration::from_millis(timeout_ms);

    let decode_result = timeout(timeout_duration, async {
        tokio::task::spawn_blocking(move || decode_sync(&path_owned)).await
    })
    .await;

    match decode_result {
        Ok(Ok(Ok(image))) => Ok(image),
        Ok(Ok(Err(e))) => Err(e),
        Ok(Err(e)) => Err(PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        }),
        Err(_) => Err(PipelineError::Timeout {
            path: path.to_path_buf(),
            stage: "decode".to_string(),
            timeout_ms,
        }),
    }
}

/// Synchronous decode (runs in spawn_blocking).
fn decode_sync(path: &Path) -> Result<DynamicImage, PipelineError> {
    let reader = image::ImageReader::open(path).map_err(|e| PipelineError::FileUnreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let reader = reader
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })?;
    reader.decode().map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[tokio::test]
    async fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");
        DynamicImage::ImageRgb8(RgbImage::new(20, 10))
            .save(&path)
            .unwrap();

        let image = decode_image(&path, 5000).await.unwrap();
        assert_eq!((image.width(), image.height()), (20, 10));
    }

    #[tokio::test]
    async fn test_decode_missing_file_is_unreadable() {
        let err = decode_image(Path::new("/no/such/file.png"), 5000)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileUnreadable { .. }));
    }

    #[tokio::test]
    async fn test_decode_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"this is not an image").unwrap();

        let err = decode_image(&path, 5000).await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_decode_jpeg_bytes_under_png_name() {
        // Content-based detection: JPEG payload with a .png extension.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.png");
        let mut file = std::fs::File::create(&path).unwrap();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut file, 90);
        DynamicImage::ImageRgb8(RgbImage::new(8, 4))
            .write_with_encoder(encoder)
            .unwrap();

        let image = decode_image(&path, 5000).await.unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
    }
}
