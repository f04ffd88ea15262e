//! Configuration validation shared by the augmentation crates.

pub mod errors;

pub use errors::{ConfigError, ConfigValidator};
