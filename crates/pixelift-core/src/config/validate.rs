//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.min_height == 0 {
            return Err(ConfigError::ValidationError(
                "processing.min_height must be > 0".into(),
            ));
        }
        if self.processing.jpeg_quality == 0 || self.processing.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "processing.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.processing.valid_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.valid_extensions must not be empty".into(),
            ));
        }
        if self.sr.scale == 0 {
            return Err(ConfigError::ValidationError("sr.scale must be > 0".into()));
        }
        if self.sr.algorithm.is_empty() {
            return Err(ConfigError::ValidationError(
                "sr.algorithm must not be empty".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.inference_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.inference_timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
