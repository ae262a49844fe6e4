//! Header-only dimension probing.

use std::path::Path;

use crate::error::PipelineError;

/// Reads image dimensions without decoding pixel data.
pub struct DimensionProbe;

impl DimensionProbe {
    /// Return the pixel width and height of the image at `path`.
    ///
    /// The reader handle is scoped to this call and released on every exit
    /// path. Format detection is content-based, so a file whose payload no
    /// longer matches its extension still probes correctly.
    pub fn probe(path: &Path) -> Result<(u32, u32), PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::FileUnreadable {
                path: path.to_path_buf(),
                message: "not a regular file".to_string(),
            });
        }

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
        reader.into_dimensions().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_probe_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        DynamicImage::ImageRgb8(RgbImage::new(800, 300))
            .save(&path)
            .unwrap();

        assert_eq!(DimensionProbe::probe(&path).unwrap(), (800, 300));
    }

    #[test]
    fn test_probe_missing_file() {
        let err = DimensionProbe::probe(Path::new("/no/such/file.png")).unwrap_err();
        assert!(matches!(err, PipelineError::FileUnreadable { .. }));
    }

    #[test]
    fn test_probe_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = DimensionProbe::probe(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::FileUnreadable { .. }));
    }

    #[test]
    fn test_probe_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.jpg");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = DimensionProbe::probe(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_probe_jpeg_bytes_under_png_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.png");
        let mut file = std::fs::File::create(&path).unwrap();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut file, 90);
        DynamicImage::ImageRgb8(RgbImage::new(64, 32))
            .write_with_encoder(encoder)
            .unwrap();

        assert_eq!(DimensionProbe::probe(&path).unwrap(), (64, 32));
    }
}
