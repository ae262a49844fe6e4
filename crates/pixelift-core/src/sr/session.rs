//! ONNX session management for super-resolution models.
//!
//! Loads an FSRCNN/ESPCN-style upscaler exported to ONNX format and runs
//! inference on NCHW pixel tensors.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Wraps an ONNX Runtime session for super-resolution inference.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
#[derive(Debug)]
pub(crate) struct SrSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl SrSession {
    /// Load a super-resolution model from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .map_err(|e| PipelineError::ModelLoad {
                path: model_path.to_path_buf(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::ModelLoad {
                path: model_path.to_path_buf(),
                message: format!("Failed to load ONNX model: {e}"),
            })?;

        // Detect the input tensor name from model metadata.
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input".to_string());

        tracing::debug!(
            "Loaded SR model from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run inference on a pixel tensor and return the upscaled tensor.
    ///
    /// Input shape: \[1, 3, H, W\] (NCHW, normalized to \[0, 1\]).
    /// Output: shape and flat data of the model's first (only) output,
    /// expected \[1, 3, H*scale, W*scale\].
    pub fn run(
        &self,
        tensor: &Array4<f32>,
        path: &Path,
    ) -> Result<(Vec<usize>, Vec<f32>), PipelineError> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| PipelineError::Inference {
                path: path.to_path_buf(),
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("Session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("ONNX inference failed: {e}"),
        })?;

        // SR models produce a single output tensor.
        let (_, output) = outputs.iter().next().ok_or_else(|| PipelineError::Inference {
            path: path.to_path_buf(),
            message: "Model produced no output".to_string(),
        })?;

        let (out_shape, data) =
            output
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Inference {
                    path: path.to_path_buf(),
                    message: format!("Failed to extract output tensor: {e}"),
                })?;

        if out_shape.len() != 4 {
            return Err(PipelineError::Inference {
                path: path.to_path_buf(),
                message: format!("Unexpected output rank: {:?}", out_shape),
            });
        }

        let out_shape: Vec<usize> = out_shape.iter().map(|&d| d as usize).collect();
        Ok((out_shape, data.to_vec()))
    }
}
