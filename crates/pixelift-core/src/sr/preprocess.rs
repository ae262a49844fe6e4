//! Pixel buffer conversion for super-resolution inference.
//!
//! The exported FSRCNN/ESPCN models expect:
//! - Normalization: pixels scaled to [0, 1] (plain /255, no mean shift)
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]
//!
//! The output tensor uses the same layout at `scale` times the spatial size
//! and is clamped back to [0, 1] before the 8-bit conversion.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use crate::error::PipelineError;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// Convert an image into an NCHW tensor suitable for ONNX Runtime.
pub(crate) fn image_to_tensor(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let (w, h) = (width as usize, height as usize);

    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, h, w));

    // Access raw RGB bytes and the tensor slice directly to avoid per-pixel
    // bounds-checking overhead from get_pixel() and 4D ndarray indexing.
    let raw = rgb.as_raw();
    let tensor_data = tensor
        .as_slice_mut()
        .unwrap_or_else(|| unreachable!("freshly allocated Array4 is contiguous"));
    for (i, pixel) in raw.chunks_exact(CHANNELS).enumerate() {
        let y = i / w;
        let x = i % w;
        for (c, &val) in pixel.iter().enumerate() {
            // NCHW layout: offset = c * h * w + y * w + x
            tensor_data[c * h * w + y * w + x] = val as f32 / 255.0;
        }
    }

    tensor
}

/// Convert a model output tensor back into an RGB image.
///
/// Expects shape `[1, 3, height, width]`. Values are clamped to [0, 1]
/// before the 8-bit conversion; models can overshoot slightly around
/// hard edges.
pub(crate) fn tensor_to_image(
    shape: &[usize],
    data: &[f32],
    path: &Path,
) -> Result<DynamicImage, PipelineError> {
    if shape.len() != 4 || shape[0] != 1 || shape[1] != CHANNELS {
        return Err(PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("Unexpected output tensor shape: {:?}", shape),
        });
    }
    let (h, w) = (shape[2], shape[3]);
    if data.len() < CHANNELS * h * w {
        return Err(PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!(
                "Output tensor truncated: expected {} values, got {}",
                CHANNELS * h * w,
                data.len()
            ),
        });
    }

    let mut raw = vec![0u8; h * w * CHANNELS];
    for (i, slot) in raw.iter_mut().enumerate() {
        let pixel = i / CHANNELS;
        let c = i % CHANNELS;
        let y = pixel / w;
        let x = pixel % w;
        let val = data[c * h * w + y * w + x];
        *slot = (val.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    let buffer = RgbImage::from_raw(w as u32, h as u32, raw).ok_or_else(|| {
        PipelineError::Inference {
            path: path.to_path_buf(),
            message: "Output buffer size mismatch".to_string(),
        }
    })?;
    Ok(DynamicImage::ImageRgb8(buffer))
}
