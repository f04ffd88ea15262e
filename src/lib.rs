//! # Table Augment
//!
//! Synthesizes extra training samples for table structure recognition.
//! Annotated tables are cropped from their pages and their rows and columns
//! are randomly duplicated or removed; each accepted result is written as a
//! new image with a matching ground-truth document and OCR word list.
//!
//! ## Components
//!
//! - **OCR cache**: word boxes per page, computed once with Tesseract and
//!   stored next to the inputs
//! - **Augmentation policy**: tiered, data-driven choice of how many rows and
//!   columns to duplicate or remove
//! - **Acceptance check**: keeps only tables that changed size and still fit
//!   on their page
//! - **Sample generator**: loops over the inputs until enough samples exist,
//!   isolating failures per table and per file
//!
//! ## Modules
//!
//! * [`augment`] - Augmentation policy and acceptance
//! * [`ocr`] - OCR engines, the word list cache and text masks
//! * [`pipeline`] - Configuration, generation loop, output and run log
//! * [`utils`] - Logging setup
//!
//! Domain types (word boxes, ground truth, the table model) live in
//! `table-augment-core` and are re-exported through [`prelude`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use table_augment::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ConfigLoader::load_from_file(Path::new("augment.toml"))?;
//! config.num_samples = 100;
//!
//! let engine = TesseractEngine::default();
//! let report = SampleGenerator::new(config, engine).run()?;
//! println!("{}", report.stats);
//! # Ok(())
//! # }
//! ```

pub mod augment;
pub mod ocr;
pub mod pipeline;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use table_augment::prelude::*;
/// ```
pub mod prelude {
    pub use crate::augment::{AugmentOutcome, AugmentationPolicy, augment_table};
    #[cfg(feature = "tesseract")]
    pub use crate::ocr::TesseractEngine;
    pub use crate::ocr::{OcrCache, OcrEngine, OcrSettings};
    pub use crate::pipeline::{
        AugmentConfig, ConfigLoader, GenerationReport, RunOutcome, SampleGenerator,
    };

    pub use table_augment_core::prelude::*;
}
