//! Generation run statistics.

use crate::augment::AugmentOutcome;
use std::fmt;

/// Counters for one generation run.
///
/// `generated` is the accepted-sample counter the run loop compares against
/// `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Requested number of samples.
    pub target: usize,
    /// Samples written.
    pub generated: usize,
    /// Passes started over the input list.
    pub passes: usize,
    /// Input files visited, counting revisits.
    pub files_visited: usize,
    /// Tables handed to the augmentation policy.
    pub tables_tried: usize,
    /// Rejected because the table outgrew its page.
    pub rejected_oversized: usize,
    /// Rejected because the table size did not change.
    pub rejected_unchanged: usize,
    /// Rejected because an edit failed.
    pub augmentation_failures: usize,
    /// Accepted tables whose structure could not be serialized.
    pub serialization_failures: usize,
    /// Files skipped for a missing image or descriptor.
    pub missing_inputs: usize,
    /// Files abandoned on an unexpected error.
    pub file_failures: usize,
}

impl GenerationStats {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.generated >= self.target
    }

    /// Counts a rejected augmentation outcome. Accepted outcomes are counted
    /// once their sample is written.
    pub fn record_outcome(&mut self, outcome: &AugmentOutcome) {
        match outcome {
            AugmentOutcome::Accepted { .. } => {}
            AugmentOutcome::Oversized { .. } => self.rejected_oversized += 1,
            AugmentOutcome::Unchanged => self.rejected_unchanged += 1,
            AugmentOutcome::Failed(_) => self.augmentation_failures += 1,
        }
    }

    /// Share of tried tables that produced a sample, as a percentage.
    pub fn acceptance_rate(&self) -> f64 {
        if self.tables_tried == 0 {
            0.0
        } else {
            (self.generated as f64 / self.tables_tried as f64) * 100.0
        }
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation Statistics:")?;
        writeln!(f, "  Generated: {} / {}", self.generated, self.target)?;
        writeln!(
            f,
            "  Passes: {} ({} files visited)",
            self.passes, self.files_visited
        )?;
        writeln!(
            f,
            "  Tables tried: {} ({:.1}% accepted)",
            self.tables_tried,
            self.acceptance_rate()
        )?;
        writeln!(
            f,
            "  Rejected: {} oversized, {} unchanged, {} failed edits, {} invalid structures",
            self.rejected_oversized,
            self.rejected_unchanged,
            self.augmentation_failures,
            self.serialization_failures
        )?;
        writeln!(
            f,
            "  Skipped files: {} missing inputs, {} errors",
            self.missing_inputs, self.file_failures
        )?;
        Ok(())
    }
}
