//! Utility functions for image processing.
//!
//! Pages are handled as 8-bit grayscale throughout. Structural edits
//! (duplicating or deleting a row/column strip) are expressed as pixel index
//! remaps so each edit is a single pass over the output buffer.

use crate::core::{AugmentError, AugmentResult};
use crate::domain::table::Axis;
use image::{GrayImage, ImageBuffer, imageops};
use std::ops::Range;
use std::path::Path;

/// Loads an image from disk and converts it to grayscale.
///
/// # Errors
///
/// Returns an image-load processing error naming the path when the file
/// cannot be opened or decoded.
pub fn load_gray_image(path: &Path) -> AugmentResult<GrayImage> {
    let img = image::open(path).map_err(|e| AugmentError::image_read(path, e))?;
    Ok(img.to_luma8())
}

/// Saves a grayscale image; the format follows the path extension.
pub fn save_gray_image(image: &GrayImage, path: &Path) -> AugmentResult<()> {
    image
        .save(path)
        .map_err(|e| AugmentError::output(path, e))
}

/// Copies the `width` x `height` region at (`x`, `y`) out of `image`.
///
/// The region is clipped to the image bounds by `imageops::crop_imm`.
pub fn crop_region(image: &GrayImage, x: u32, y: u32, width: u32, height: u32) -> GrayImage {
    imageops::crop_imm(image, x, y, width, height).to_image()
}

/// Resizes `image` to exactly `target_width` pixels wide, keeping the aspect
/// ratio.
///
/// Returns the resized image and the scale factor `target_width / width`.
/// The new height is `trunc(ratio * height)`, clamped to at least one pixel.
pub fn resize_to_width(image: &GrayImage, target_width: u32) -> (GrayImage, f64) {
    let (width, height) = image.dimensions();
    let ratio = f64::from(target_width) / f64::from(width.max(1));
    let target_height = ((ratio * f64::from(height)) as u32).max(1);
    let resized = imageops::resize(
        image,
        target_width,
        target_height,
        imageops::FilterType::CatmullRom,
    );
    (resized, ratio)
}

/// Inserts a copy of the strip `source` before pixel offset `at`.
///
/// For [`Axis::Row`] the strip is a band of rows and the image grows in
/// height; for [`Axis::Column`] it grows in width. `source` is expressed in
/// coordinates of the input image.
pub fn insert_strip(image: &GrayImage, axis: Axis, source: Range<u32>, at: u32) -> GrayImage {
    let len = source.end - source.start;
    let (width, height) = image.dimensions();
    let remap = |p: u32| {
        if p < at {
            p
        } else if p < at + len {
            source.start + (p - at)
        } else {
            p - len
        }
    };

    match axis {
        Axis::Row => ImageBuffer::from_fn(width, height + len, |x, y| *image.get_pixel(x, remap(y))),
        Axis::Column => {
            ImageBuffer::from_fn(width + len, height, |x, y| *image.get_pixel(remap(x), y))
        }
    }
}

/// Deletes the strip `range` along `axis`.
pub fn remove_strip(image: &GrayImage, axis: Axis, range: Range<u32>) -> GrayImage {
    let len = range.end - range.start;
    let (width, height) = image.dimensions();
    let remap = |p: u32| if p < range.start { p } else { p + len };

    match axis {
        Axis::Row => ImageBuffer::from_fn(width, height - len, |x, y| *image.get_pixel(x, remap(y))),
        Axis::Column => {
            ImageBuffer::from_fn(width - len, height, |x, y| *image.get_pixel(remap(x), y))
        }
    }
}
