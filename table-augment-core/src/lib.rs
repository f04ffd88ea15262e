//! # Table Augment Core
//!
//! Core types for the table-augment workspace.
//!
//! This crate provides:
//! - Error handling types
//! - Domain types (word boxes, ground-truth documents, table models)
//! - Image utilities for cropping and strip edits
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration validation and constants
//! * [`domain`] - Word boxes, ground-truth XML and the table model
//! * [`utils`] - Grayscale image helpers

pub mod core;
pub mod domain;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{AugmentError, AugmentResult, TableError};
    pub use crate::domain::{
        Axis, Block, GridTable, ImageShape, TableModel, WordBox, XmlElement,
    };
    pub use crate::utils::{load_gray_image, save_gray_image};
}
