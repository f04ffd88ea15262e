//! OCR engines producing word-level detections.

use image::GrayImage;
use table_augment_core::core::AugmentResult;
#[cfg(feature = "tesseract")]
use table_augment_core::core::{AugmentError, DEFAULT_OCR_ENGINE_MODE};

/// One detection as reported by the engine, in the coordinates of the image
/// the engine was given.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrDetection {
    /// Structural level (Tesseract: 1 page .. 5 word).
    pub level: u32,
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
}

/// An OCR engine that can be run on a grayscale page.
pub trait OcrEngine {
    /// Runs recognition and returns every detection, at every level.
    fn detect(&self, image: &GrayImage) -> AugmentResult<Vec<OcrDetection>>;
}

impl<E: OcrEngine + ?Sized> OcrEngine for &E {
    fn detect(&self, image: &GrayImage) -> AugmentResult<Vec<OcrDetection>> {
        (**self).detect(image)
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Box<E> {
    fn detect(&self, image: &GrayImage) -> AugmentResult<Vec<OcrDetection>> {
        (**self).detect(image)
    }
}

/// Tesseract, driven through its command line.
///
/// The page is handed over as a temporary PNG so the engine does not depend
/// on the `image` version used by the wrapper crate.
#[cfg(feature = "tesseract")]
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    language: String,
    engine_mode: i32,
}

#[cfg(feature = "tesseract")]
impl TesseractEngine {
    pub fn new(language: impl Into<String>, engine_mode: i32) -> Self {
        Self {
            language: language.into(),
            engine_mode,
        }
    }
}

#[cfg(feature = "tesseract")]
impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("eng", DEFAULT_OCR_ENGINE_MODE)
    }
}

#[cfg(feature = "tesseract")]
impl OcrEngine for TesseractEngine {
    fn detect(&self, image: &GrayImage) -> AugmentResult<Vec<OcrDetection>> {
        let file = tempfile::Builder::new().suffix(".png").tempfile()?;
        image
            .save_with_format(file.path(), image::ImageFormat::Png)
            .map_err(|e| AugmentError::ocr("writing OCR input", e))?;

        let input = rusty_tesseract::Image::from_path(file.path().to_path_buf())
            .map_err(|e| AugmentError::ocr_message(format!("tesseract input: {e}")))?;
        let args = rusty_tesseract::Args {
            lang: self.language.clone(),
            oem: Some(self.engine_mode),
            psm: Some(3),
            dpi: None,
            ..Default::default()
        };
        let output = rusty_tesseract::image_to_data(&input, &args)
            .map_err(|e| AugmentError::ocr_message(format!("tesseract: {e}")))?;

        Ok(output
            .data
            .into_iter()
            .map(|row| OcrDetection {
                level: row.level.max(0) as u32,
                text: row.text,
                left: row.left,
                top: row.top,
                width: row.width,
                height: row.height,
                confidence: row.conf,
            })
            .collect())
    }
}
