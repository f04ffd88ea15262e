//! Utility functions shared by the augmentation crates.

pub mod image;

pub use self::image::{
    crop_region, insert_strip, load_gray_image, remove_strip, resize_to_width, save_gray_image,
};
