//! The sample generation loop.
//!
//! Input files are visited in stem order, over and over, until enough
//! samples have been written. Every table of every visited page gets one
//! augmentation attempt per visit. Failures are contained: a bad table is
//! rejected, a bad file is skipped, and only configuration, output setup
//! and writing the final log can fail the run itself.

use super::config::AugmentConfig;
use super::log::{LogEntry, RunLog};
use super::output::SampleWriter;
use super::stats::GenerationStats;
use crate::augment::{AugmentOutcome, augment_table};
use crate::ocr::{OcrCache, OcrEngine, mask_coverage, word_mask};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::marker::PhantomData;
use std::path::Path;
use table_augment_core::core::{AugmentError, AugmentResult, ConfigValidator, GROUND_TRUTH_EXTENSION};
use table_augment_core::domain::{GridTable, ImageShape, TableModel, XmlElement};
use table_augment_core::utils::load_gray_image;
use tracing::{debug, error, info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested number of samples was written.
    Completed,
    /// The inputs stopped producing samples before the target was reached.
    Exhausted,
}

/// Result of [`SampleGenerator::run`].
#[derive(Debug)]
pub struct GenerationReport {
    pub outcome: RunOutcome,
    pub stats: GenerationStats,
    pub log: RunLog,
}

/// Drives OCR, augmentation and output for a whole input set.
///
/// `T` is the table model built for each `Table` region.
pub struct SampleGenerator<E, T = GridTable> {
    config: AugmentConfig,
    ocr: OcrCache<E>,
    rng: StdRng,
    _model: PhantomData<fn() -> T>,
}

impl<E: OcrEngine> SampleGenerator<E, GridTable> {
    pub fn new(config: AugmentConfig, engine: E) -> Self {
        Self::with_model(config, engine)
    }
}

impl<E: OcrEngine, T: TableModel> SampleGenerator<E, T> {
    /// Creates a generator using table model `T`.
    ///
    /// The random generator is seeded from `config.seed` when present and
    /// from system entropy otherwise.
    pub fn with_model(config: AugmentConfig, engine: E) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ocr = OcrCache::new(engine, config.ocr.clone());
        Self {
            config,
            ocr,
            rng,
            _model: PhantomData,
        }
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    pub fn ocr(&self) -> &OcrCache<E> {
        &self.ocr
    }

    /// Generates samples until the target is reached or the inputs are
    /// exhausted.
    pub fn run(&mut self) -> AugmentResult<GenerationReport> {
        self.config.validate()?;
        let writer = SampleWriter::create(&self.config.out_dir, &self.config.ocr_extension)?;
        let files = list_input_stems(&self.config.xml_dir)?;
        info!(
            "Generating {} samples from {} inputs into {}",
            self.config.num_samples,
            files.len(),
            writer.root().display()
        );

        let mut stats = GenerationStats::new(self.config.num_samples);
        let mut log = RunLog::new();
        let mut idle_passes = 0usize;

        let outcome = loop {
            if stats.is_complete() {
                break RunOutcome::Completed;
            }
            if files.is_empty() {
                warn!("No ground-truth files in {}", self.config.xml_dir.display());
                break RunOutcome::Exhausted;
            }

            stats.passes += 1;
            let generated_before = stats.generated;
            for file in &files {
                if stats.is_complete() {
                    break;
                }
                info!("[{} / {}] {}", stats.generated, stats.target, file);
                stats.files_visited += 1;

                if let Err(err) = self.process_file(file, &writer, &mut stats, &mut log) {
                    let entry = LogEntry::file_failure(file, &err);
                    error!("{entry}");
                    stats.file_failures += 1;
                    log.record(entry);
                }
            }

            if stats.generated > generated_before {
                idle_passes = 0;
            } else {
                idle_passes += 1;
                if idle_passes >= self.config.max_idle_passes {
                    warn!(
                        "No sample accepted in {idle_passes} consecutive passes, stopping at {} / {}",
                        stats.generated, stats.target
                    );
                    break RunOutcome::Exhausted;
                }
            }
        };

        if let Some(path) = &self.config.log_file {
            log.write_to(path)?;
            info!("Error logs have been written to: {}", path.display());
        }
        info!("{stats}");

        Ok(GenerationReport {
            outcome,
            stats,
            log,
        })
    }

    /// Tries every table of one input file once.
    fn process_file(
        &mut self,
        file: &str,
        writer: &SampleWriter,
        stats: &mut GenerationStats,
        log: &mut RunLog,
    ) -> AugmentResult<()> {
        let image_path = self.config.image_path(file);
        let xml_path = self.config.xml_path(file);
        for path in [&image_path, &xml_path] {
            if !path.exists() {
                let entry = LogEntry::missing_input(path);
                warn!("{entry}");
                stats.missing_inputs += 1;
                log.record(entry);
                return Ok(());
            }
        }

        let page = load_gray_image(&image_path)?;
        let page_shape = ImageShape::of(&page);
        let words = self.ocr.get_ocr(&self.config.ocr_path(file), &page)?;
        let mask = word_mask(page_shape, &words);
        debug!(
            "{file}: {} words covering {:.1}% of the page",
            words.len(),
            mask_coverage(&mask) * 100.0
        );

        let document = XmlElement::from_file(&xml_path)?;
        for (index, region) in document.tables().into_iter().enumerate() {
            if stats.is_complete() {
                break;
            }

            let mut table = T::from_region(&page, region, &words)?;
            stats.tables_tried += 1;
            let outcome = augment_table(&mut table, page_shape, &self.config.policy, &mut self.rng);
            stats.record_outcome(&outcome);
            match outcome {
                AugmentOutcome::Accepted { shape } => {
                    debug!("{file} table {index}: accepted {shape}");
                }
                AugmentOutcome::Failed(err) => {
                    log.record(LogEntry::augmentation(file, index, &err));
                    continue;
                }
                AugmentOutcome::Oversized { .. } | AugmentOutcome::Unchanged => continue,
            }

            let name = writer.next_sample_name(file, index);
            let Some(fragment) = table.to_xml() else {
                let entry = LogEntry::serialization(file, index);
                warn!("{entry}");
                stats.serialization_failures += 1;
                log.record(entry);
                continue;
            };

            writer.write(&name, &table, fragment)?;
            stats.generated += 1;
        }
        Ok(())
    }
}

/// Stems of the `*.xml` files in `dir`, sorted.
pub fn list_input_stems(dir: &Path) -> AugmentResult<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        AugmentError::config_error(format!("cannot list {}: {e}", dir.display()))
    })?;

    let mut stems = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(GROUND_TRUTH_EXTENSION)
        {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_input_stems_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xml", "a.xml", "c.png", "notes.txt", "a.b.xml"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.xml")).unwrap();

        let stems = list_input_stems(dir.path()).unwrap();
        assert_eq!(stems, vec!["a", "a.b", "b"]);
    }

    #[test]
    fn test_list_input_stems_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_input_stems(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, AugmentError::ConfigError { .. }));
    }
}
