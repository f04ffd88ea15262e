//! Text masks built from OCR word boxes.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use table_augment_core::domain::{ImageShape, WordBox};

const TEXT: Luma<u8> = Luma([255]);

/// Whether a word contributes to the mask: something other than ASCII
/// punctuation and whitespace must remain.
fn has_content(text: &str) -> bool {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .any(|c| !c.is_whitespace())
}

/// Builds a mask of `shape` with every content word filled in white.
///
/// Rectangles include both corners, so a word spanning `left..=right`
/// covers `right - left + 1` pixels. Boxes with inverted coordinates are
/// skipped; boxes crossing the border are clipped by the drawing routine.
pub fn word_mask(shape: ImageShape, words: &[WordBox]) -> GrayImage {
    let mut mask = GrayImage::new(shape.width, shape.height);
    for word in words.iter().filter(|w| has_content(&w.text)) {
        if word.right < word.left || word.bottom < word.top {
            continue;
        }
        let rect = Rect::at(word.left, word.top).of_size(
            (word.right - word.left) as u32 + 1,
            (word.bottom - word.top) as u32 + 1,
        );
        draw_filled_rect_mut(&mut mask, rect, TEXT);
    }
    mask
}

/// Fraction of mask pixels set.
pub fn mask_coverage(mask: &GrayImage) -> f64 {
    let total = mask.width() as usize * mask.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let set = mask.pixels().filter(|p| p.0[0] > 0).count();
    set as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_mask_fills_inclusive_rectangles() {
        let words = vec![WordBox::new("cell", 2, 3, 5, 4)];
        let mask = word_mask(ImageShape::new(10, 10), &words);

        assert_eq!(mask.get_pixel(2, 3).0[0], 255);
        assert_eq!(mask.get_pixel(5, 4).0[0], 255);
        assert_eq!(mask.get_pixel(6, 4).0[0], 0);
        assert_eq!(mask.get_pixel(2, 5).0[0], 0);
        assert_eq!(mask.pixels().filter(|p| p.0[0] == 255).count(), 8);
    }

    #[test]
    fn test_word_mask_skips_punctuation_only_words() {
        let words = vec![
            WordBox::new("--", 0, 0, 4, 4),
            WordBox::new(" . ", 0, 5, 4, 9),
            WordBox::new("(a)", 6, 6, 7, 7),
        ];
        let mask = word_mask(ImageShape::new(10, 10), &words);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(0, 6).0[0], 0);
        assert_eq!(mask.get_pixel(6, 6).0[0], 255);
    }

    #[test]
    fn test_word_mask_clips_to_image() {
        let words = vec![WordBox::new("edge", 8, 8, 20, 20)];
        let mask = word_mask(ImageShape::new(10, 10), &words);
        assert_eq!(mask.dimensions(), (10, 10));
        assert!((mask_coverage(&mask) - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_mask_coverage_of_empty_mask() {
        assert_eq!(mask_coverage(&GrayImage::new(0, 0)), 0.0);
        assert_eq!(mask_coverage(&GrayImage::new(4, 4)), 0.0);
    }
}
