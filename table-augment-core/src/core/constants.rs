//! Constants used throughout the augmentation pipeline.

/// Page width (pixels) the OCR engine sees.
///
/// Pages are resized to this width before OCR and the detected boxes are
/// scaled back to page coordinates.
pub const DEFAULT_OCR_TARGET_WIDTH: u32 = 2500;

/// Detections at or below this Tesseract level are discarded.
///
/// Level 5 is word level; blocks, paragraphs and lines are coarser.
pub const DEFAULT_OCR_MIN_LEVEL: u32 = 4;

/// Tesseract OCR engine mode (LSTM only).
pub const DEFAULT_OCR_ENGINE_MODE: i32 = 1;

/// A word box is an outlier when its area reaches this multiple of the
/// reference area.
pub const DEFAULT_OUTLIER_FACTOR: f64 = 30.0;

/// Consecutive passes over the file list without an accepted sample before a
/// run gives up.
pub const DEFAULT_MAX_IDLE_PASSES: usize = 10;

/// Extension of page images and generated sample images.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Extension of OCR word list files (cache and generated samples).
pub const DEFAULT_OCR_EXTENSION: &str = "json";

/// Extension of ground-truth descriptors.
pub const GROUND_TRUTH_EXTENSION: &str = "xml";

/// Output subdirectory names.
pub const IMAGES_SUBDIR: &str = "images";
pub const OCR_SUBDIR: &str = "ocr";
pub const GT_SUBDIR: &str = "gt";

/// Indentation width of written ground-truth XML.
pub const XML_INDENT: usize = 3;
