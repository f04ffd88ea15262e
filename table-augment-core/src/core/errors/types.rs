//! Error type definitions for the augmentation pipeline.

use thiserror::Error;

/// Stage of the augmentation pipeline an error originated from.
///
/// Used to tag [`AugmentError::Processing`] so log entries can tell the
/// swallowed failure categories apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Loading or resizing a page image.
    ImageLoad,
    /// Running the OCR engine or reading/writing its cache.
    Ocr,
    /// Reading or writing ground-truth XML.
    GroundTruth,
    /// Mutating a table model.
    Augmentation,
    /// Writing an accepted sample.
    Output,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::ImageLoad => write!(f, "image load"),
            ProcessingStage::Ocr => write!(f, "ocr"),
            ProcessingStage::GroundTruth => write!(f, "ground truth"),
            ProcessingStage::Augmentation => write!(f, "augmentation"),
            ProcessingStage::Output => write!(f, "output"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Errors raised by a table model while it is built or mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The region descriptor cannot describe a table on this page.
    #[error("invalid table region: {message}")]
    InvalidRegion {
        /// What was wrong with the region.
        message: String,
    },

    /// A block index outside the current structure.
    #[error("{axis} index {index} out of range for {len} blocks")]
    IndexOutOfRange {
        /// Axis name ("row" or "column").
        axis: &'static str,
        /// Offending index.
        index: usize,
        /// Current number of blocks on that axis.
        len: usize,
    },

    /// The block is only part of a merged cell and cannot be copied alone.
    #[error("{axis} block {index} is covered by a spanning cell")]
    SpannedBlock {
        /// Axis name ("row" or "column").
        axis: &'static str,
        /// Index of the block.
        index: usize,
    },

    /// Removing the block would leave the axis empty.
    #[error("cannot remove the last {axis} block")]
    LastBlock {
        /// Axis name ("row" or "column").
        axis: &'static str,
    },
}

/// Opaque error carrying only a message, used when the underlying failure
/// does not expose a `std::error::Error` type.
#[derive(Debug)]
pub struct OpaqueError(pub String);

impl std::fmt::Display for OpaqueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for OpaqueError {}

/// Errors that can occur while generating augmented samples.
#[derive(Error, Debug)]
pub enum AugmentError {
    /// Error occurred while loading or encoding an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Malformed ground-truth XML.
    #[error("ground truth: {message}")]
    GroundTruth {
        /// A message describing the parse failure.
        message: String,
    },

    /// The axis has no interior block to pick from.
    #[error("no interior {axis} block among {len} blocks")]
    NoInteriorBlock {
        /// Axis name ("row" or "column").
        axis: &'static str,
        /// Current number of blocks on that axis.
        len: usize,
    },

    /// Error raised by the table model.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Error (de)serializing OCR word lists.
    #[error("serialization")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}
