//! OCR word extraction.
//!
//! This module provides the engine abstraction, the on-disk word list cache
//! with outlier filtering, and the text mask built from word boxes.

mod cache;
mod engine;
mod mask;

pub use cache::{
    OcrCache, OcrSettings, filter_outliers, read_word_list, words_from_detections,
    write_word_list,
};
#[cfg(feature = "tesseract")]
pub use engine::TesseractEngine;
pub use engine::{OcrDetection, OcrEngine};
pub use mask::{mask_coverage, word_mask};
