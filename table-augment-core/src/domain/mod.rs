//! Domain types for table augmentation.
//!
//! - [`word`] - OCR word boxes and image shapes
//! - [`ground_truth`] - ground-truth XML element tree
//! - [`table`] - the table model mutated by augmentation

pub mod ground_truth;
pub mod table;
pub mod word;

pub use ground_truth::XmlElement;
pub use table::{Axis, Block, GridCell, GridTable, Span, TableModel};
pub use word::{ImageShape, WordBox};
