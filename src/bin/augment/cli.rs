//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;
use table_augment::pipeline::AugmentConfig;

/// Generates augmented table samples from annotated pages.
#[derive(Parser, Debug)]
#[command(name = "table-augment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Generates table structure samples by duplicating and removing rows and columns",
    long_about = None
)]
pub struct Cli {
    /// Directory of page images
    #[arg(long = "image-dir", visible_alias = "img")]
    pub image_dir: Option<PathBuf>,

    /// Directory of ground-truth XML files
    #[arg(long = "xml-dir", visible_alias = "xml")]
    pub xml_dir: Option<PathBuf>,

    /// Directory of OCR files (missing ones are generated and saved here)
    #[arg(long = "ocr-dir", visible_alias = "ocr")]
    pub ocr_dir: Option<PathBuf>,

    /// Number of augmented samples to generate
    #[arg(short = 'n', long = "num-samples")]
    pub num_samples: Option<usize>,

    /// Output directory for generated samples
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// File to write the error log to
    #[arg(long = "log-file", visible_alias = "log")]
    pub log_file: Option<PathBuf>,

    /// TOML or JSON configuration file; flags override its values
    #[arg(long, env = "TABLE_AUGMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Passes without a new sample before giving up
    #[arg(long = "max-idle-passes")]
    pub max_idle_passes: Option<usize>,
}

impl Cli {
    /// Overrides `config` with every flag that was given.
    pub fn apply_to(&self, config: &mut AugmentConfig) {
        if let Some(dir) = &self.image_dir {
            config.image_dir = dir.clone();
        }
        if let Some(dir) = &self.xml_dir {
            config.xml_dir = dir.clone();
        }
        if let Some(dir) = &self.ocr_dir {
            config.ocr_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(n) = self.num_samples {
            config.num_samples = n;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(passes) = self.max_idle_passes {
            config.max_idle_passes = passes;
        }
    }
}
