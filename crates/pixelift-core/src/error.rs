//! Error types for the pixelift image preparation pipeline.
//!
//! Errors are organized by stage so that failures carry the context (file
//! path, stage, specific issue) needed to act on them. The orchestrator
//! treats every per-file error as benign; only configuration, model-load,
//! and top-level directory errors are fatal to a run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pixelift operations.
#[derive(Error, Debug)]
pub enum PixeliftError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The top-level input path is not an existing directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A candidate file could not be opened or is not a regular file
    #[error("Unreadable file {path}: {message}")]
    FileUnreadable { path: PathBuf, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Super-resolution model inference failed
    #[error("Inference error for {path}: {message}")]
    Inference { path: PathBuf, message: String },

    /// Image encoding or the atomic replace of the target file failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Downscale was requested with a target height above the current height
    #[error("Input too small for downscale: {path} is {height}px high, target is {target}px")]
    InputTooSmall {
        path: PathBuf,
        height: u32,
        target: u32,
    },

    /// The super-resolution model could not be loaded at startup
    #[error("Model load failed for {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },
}

/// Convenience type alias for pixelift results.
pub type Result<T> = std::result::Result<T, PixeliftError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
