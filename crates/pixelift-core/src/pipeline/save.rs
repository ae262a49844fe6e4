//! Atomic image writes for in-place overwrite.
//!
//! Every pipeline step that rewrites a file encodes into a temporary file in
//! the destination's directory and renames it over the target, so an
//! interrupted encode never leaves a corrupted file behind. The temp file
//! must live next to the destination: rename is only atomic within one
//! filesystem.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;

use crate::error::PipelineError;

/// Encode `image` in the format implied by `dest`'s extension and atomically
/// replace `dest` with the result. JPEG output uses `jpeg_quality`.
pub(crate) fn write_atomic(
    image: &DynamicImage,
    dest: &Path,
    jpeg_quality: u8,
) -> Result<(), PipelineError> {
    let format = ImageFormat::from_path(dest).map_err(|e| PipelineError::Encode {
        path: dest.to_path_buf(),
        message: format!("Unsupported output format: {}", e),
    })?;
    write_atomic_as(image, dest, format, jpeg_quality)
}

/// Like [`write_atomic`] but with an explicit output format, ignoring the
/// destination's extension.
pub(crate) fn write_atomic_as(
    image: &DynamicImage,
    dest: &Path,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<(), PipelineError> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| PipelineError::Encode {
        path: dest.to_path_buf(),
        message: format!("Cannot create temp file: {}", e),
    })?;

    let encode_result = match format {
        ImageFormat::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut tmp, jpeg_quality))
        }
        ImageFormat::Png => image.write_with_encoder(PngEncoder::new(&mut tmp)),
        other => image.write_to(&mut tmp, other),
    };
    encode_result.map_err(|e| PipelineError::Encode {
        path: dest.to_path_buf(),
        message: e.to_string(),
    })?;

    tmp.persist(dest).map_err(|e| PipelineError::Encode {
        path: dest.to_path_buf(),
        message: format!("Cannot replace target: {}", e),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_write_atomic_png() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 20));

        write_atomic(&img, &dest, 90).unwrap();

        let decoded = image::open(&dest).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 20));
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.jpg");
        std::fs::write(&dest, b"old contents").unwrap();

        let img = DynamicImage::ImageRgb8(RgbImage::new(6, 8));
        write_atomic(&img, &dest, 90).unwrap();

        let decoded = image::open(&dest).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 8));
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

        write_atomic(&img, &dest, 90).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_unknown_extension_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.xyz");
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

        let err = write_atomic(&img, &dest, 90).unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
    }

    #[test]
    fn test_write_atomic_as_forces_format() {
        // JPEG bytes written under a .png name.
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("forced.png");
        let img = DynamicImage::ImageRgb8(RgbImage::new(5, 5));

        write_atomic_as(&img, &dest, ImageFormat::Jpeg, 90).unwrap();

        let format = image::ImageReader::open(&dest)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(ImageFormat::Jpeg));
    }
}
