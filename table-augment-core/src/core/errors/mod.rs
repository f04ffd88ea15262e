//! Error types for the augmentation pipeline.
//!
//! # Usage
//!
//! ```rust
//! use table_augment_core::core::errors::{AugmentError, TableError};
//!
//! let error: AugmentError = TableError::IndexOutOfRange { axis: "row", index: 7, len: 5 }.into();
//! assert_eq!(error.to_string(), "row index 7 out of range for 5 blocks");
//! ```

pub mod constructors;
pub mod types;

pub use types::{AugmentError, OpaqueError, ProcessingStage, TableError};

/// Convenient result alias for augmentation operations.
pub type AugmentResult<T> = Result<T, AugmentError>;
