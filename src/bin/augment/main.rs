//! table-augment
//!
//! Generates augmented table-structure samples from annotated page images.
//!
//! # Usage
//!
//! ```bash
//! table-augment --img data/images --xml data/xml --ocr data/ocr -n 1000 -o data/augmented --log errors.log
//! table-augment --config augment.toml --seed 7
//! ```

mod cli;

use clap::Parser;
use cli::Cli;
use table_augment::ocr::TesseractEngine;
use table_augment::pipeline::{AugmentConfig, ConfigLoader, RunOutcome, SampleGenerator};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    table_augment::utils::init_tracing();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ConfigLoader::load_from_file(path)?
        }
        None => AugmentConfig::default(),
    };
    cli.apply_to(&mut config);

    let engine = TesseractEngine::new(config.ocr.language.clone(), config.ocr.oem);
    let mut generator = SampleGenerator::new(config, engine);
    let report = generator.run()?;

    match report.outcome {
        RunOutcome::Completed => info!("Generated {} samples", report.stats.generated),
        RunOutcome::Exhausted => warn!(
            "Inputs exhausted after {} of {} samples",
            report.stats.generated, report.stats.target
        ),
    }
    Ok(())
}
