//! OCR word boxes and image shapes.

use serde::{Deserialize, Serialize};

/// A single OCR word with its pixel bounding box.
///
/// On disk a word is stored as the 6-element record
/// `[text_length, text, left, top, right, bottom]`, which is what
/// `serde(from, into)` maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "WordRecord", into = "WordRecord")]
pub struct WordBox {
    /// Number of characters in `text`.
    pub text_length: usize,
    /// Recognized text, as reported by the engine.
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

type WordRecord = (usize, String, i32, i32, i32, i32);

impl From<WordRecord> for WordBox {
    fn from((text_length, text, left, top, right, bottom): WordRecord) -> Self {
        Self {
            text_length,
            text,
            left,
            top,
            right,
            bottom,
        }
    }
}

impl From<WordBox> for WordRecord {
    fn from(word: WordBox) -> Self {
        (
            word.text_length,
            word.text,
            word.left,
            word.top,
            word.right,
            word.bottom,
        )
    }
}

impl WordBox {
    /// Creates a word box, deriving `text_length` from the text.
    pub fn new(text: impl Into<String>, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let text = text.into();
        Self {
            text_length: text.chars().count(),
            text,
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Box area; widened so page-sized boxes cannot overflow.
    pub fn area(&self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }

    /// Centre point, rounded towards the top-left.
    pub fn center(&self) -> (i32, i32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Returns a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
            ..self.clone()
        }
    }
}

/// Height and width of an image, in that order like the raster arrays the
/// ground truth was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    pub height: u32,
    pub width: u32,
}

impl ImageShape {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Shape of any image buffer.
    pub fn of<I: image::GenericImageView>(image: &I) -> Self {
        let (width, height) = image.dimensions();
        Self { height, width }
    }

    /// True when this shape fits inside `bounds` on both axes.
    pub fn fits_within(&self, bounds: &ImageShape) -> bool {
        self.height <= bounds.height && self.width <= bounds.width
    }
}

impl std::fmt::Display for ImageShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
