//! Error constructor utilities.
//!
//! Helpers for creating [`AugmentError`] instances with a processing stage and
//! context attached, so call sites stay short:
//!
//! ```rust
//! use table_augment_core::core::AugmentError;
//!
//! let error = AugmentError::ocr(
//!     "tesseract returned no data",
//!     std::io::Error::new(std::io::ErrorKind::Other, "exit status 1"),
//! );
//! assert!(error.to_string().starts_with("ocr failed"));
//! ```

use super::types::{AugmentError, OpaqueError, ProcessingStage};
use crate::core::config::ConfigError;
use std::path::Path;

impl From<ConfigError> for AugmentError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

impl AugmentError {
    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an error for OCR engine or OCR cache failures.
    pub fn ocr(
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Ocr, context, error)
    }

    /// Creates an OCR error from a plain message.
    pub fn ocr_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::ocr(message.clone(), OpaqueError(message))
    }

    /// Creates an error for failures while writing an accepted sample.
    ///
    /// # Arguments
    ///
    /// * `path` - The output file being written.
    /// * `error` - The underlying error.
    pub fn output(path: &Path, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::processing_with_context(
            ProcessingStage::Output,
            format!("writing '{}'", path.display()),
            error,
        )
    }

    /// Creates an error for an image that could not be read from disk.
    pub fn image_read(path: &Path, error: image::ImageError) -> Self {
        Self::processing_with_context(
            ProcessingStage::ImageLoad,
            format!("reading '{}'", path.display()),
            error,
        )
    }

    /// Creates a ground-truth error from any displayable parser error.
    pub fn ground_truth(message: impl std::fmt::Display) -> Self {
        Self::GroundTruth {
            message: message.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns the processing stage this error belongs to.
    pub fn stage(&self) -> ProcessingStage {
        match self {
            Self::ImageLoad(_) => ProcessingStage::ImageLoad,
            Self::Processing { kind, .. } => *kind,
            Self::GroundTruth { .. } => ProcessingStage::GroundTruth,
            Self::NoInteriorBlock { .. } | Self::Table(_) => ProcessingStage::Augmentation,
            Self::Serialization(_) => ProcessingStage::Ocr,
            Self::InvalidInput { .. } | Self::ConfigError { .. } | Self::Io(_) => {
                ProcessingStage::Generic
            }
        }
    }
}
