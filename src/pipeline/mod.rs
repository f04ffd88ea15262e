//! The sample generation pipeline.
//!
//! This module ties OCR, augmentation and output together: configuration
//! loading, the generation loop, sample persistence, the run log and run
//! statistics.

mod config;
mod generator;
mod log;
mod output;
mod stats;

pub use config::{AugmentConfig, ConfigFormat, ConfigLoader};
pub use generator::{GenerationReport, RunOutcome, SampleGenerator, list_input_stems};
pub use log::{LogEntry, LogKind, RunLog};
pub use output::{SamplePaths, SampleWriter};
pub use stats::GenerationStats;
