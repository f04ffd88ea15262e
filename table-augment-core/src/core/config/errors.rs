//! Configuration error types and validation traits.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested sample count is zero.
    #[error("number of samples must be greater than 0")]
    InvalidSampleCount,

    /// A required input directory does not exist.
    #[error("directory does not exist: {path}")]
    DirectoryNotFound { path: std::path::PathBuf },

    /// A required setting was not provided by flags or config file.
    #[error("missing required setting: {name}")]
    MissingSetting { name: String },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a directory exists.
    fn validate_directory(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.is_dir() {
            Err(ConfigError::DirectoryNotFound {
                path: path.to_path_buf(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a count is strictly positive.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `field_name` - The name of the field being validated.
    fn validate_positive(&self, value: usize, field_name: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a float value is finite and strictly positive.
    fn validate_positive_f64(&self, value: f64, field_name: &str) -> Result<(), ConfigError> {
        if !value.is_finite() || value <= 0.0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must be a positive number, got {value}"),
            })
        } else {
            Ok(())
        }
    }

    /// Validates a file extension (non-empty, no leading dot, no separators).
    fn validate_extension(&self, extension: &str, field_name: &str) -> Result<(), ConfigError> {
        if extension.is_empty()
            || extension.starts_with('.')
            || extension.contains(['/', '\\'])
        {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} is not a valid file extension: '{extension}'"),
            })
        } else {
            Ok(())
        }
    }
}
