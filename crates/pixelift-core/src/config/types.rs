//! Sub-configuration structs with pipeline defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where super-resolution models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.pixelift/models"),
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Minimum acceptable image height in pixels; also the downscale target
    pub min_height: u32,

    /// Quality for every JPEG encode (1-100)
    pub jpeg_quality: u8,

    /// Extensions considered during directory discovery (lowercase, no dot)
    pub valid_extensions: Vec<String>,

    /// Extensions that trigger JPEG normalization (lowercase, no dot).
    /// Note: "jpeg" is in this set but not in `valid_extensions`, so a
    /// literal `.jpeg` file is only normalized if discovery is widened.
    pub normalize_extensions: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            min_height: 400,
            jpeg_quality: 90,
            valid_extensions: vec!["png".to_string(), "jpg".to_string()],
            normalize_extensions: vec!["png".to_string(), "jpeg".to_string()],
        }
    }
}

/// Super-resolution model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrConfig {
    /// Algorithm identifier; selects the model file ("fsrcnn", "espcn", ...)
    pub algorithm: String,

    /// Integer upscale factor the model was trained for
    pub scale: u32,
}

impl Default for SrConfig {
    fn default() -> Self {
        Self {
            algorithm: "fsrcnn".to_string(),
            scale: 2,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Super-resolution inference timeout in milliseconds
    pub inference_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            decode_timeout_ms: 5000,
            inference_timeout_ms: 30000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
