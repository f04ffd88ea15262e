//! Run log of swallowed failures.
//!
//! Nothing recorded here stops a run. Entries are kept in memory and written
//! out once at the end, each surrounded by blank lines.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use table_augment_core::core::{AugmentError, AugmentResult};

/// Category of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// An input file of a sample is missing; the sample is skipped.
    MissingInput,
    /// A table edit failed; the table is rejected.
    Augmentation,
    /// The edited table no longer has a valid structure; nothing is written.
    Serialization,
    /// Processing a whole input file failed.
    FileFailure,
}

/// One log entry with its rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn missing_input(path: &Path) -> Self {
        Self {
            kind: LogKind::MissingInput,
            message: format!("WARNING: '{}' not found. Skipping sample.", path.display()),
        }
    }

    pub fn augmentation(file: &str, table: usize, error: &AugmentError) -> Self {
        Self {
            kind: LogKind::Augmentation,
            message: format!("[augmentation] {file} table {table}: {error}"),
        }
    }

    pub fn serialization(file: &str, table: usize) -> Self {
        Self {
            kind: LogKind::Serialization,
            message: format!("[serialization] {file} table {table}: invalid table structure"),
        }
    }

    pub fn file_failure(file: &str, error: &AugmentError) -> Self {
        Self {
            kind: LogKind::FileFailure,
            message: format!("Exception thrown: {file}: {}", error_chain(error)),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Renders an error followed by those of its sources that add information.
fn error_chain(error: &AugmentError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Entries recorded during a run.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every entry as `"\n" + entry + "\n"`, replacing `path`.
    pub fn write_to(&self, path: &Path) -> AugmentResult<()> {
        let file = File::create(path).map_err(|e| AugmentError::output(path, e))?;
        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            write!(writer, "\n{entry}\n").map_err(|e| AugmentError::output(path, e))?;
        }
        writer.flush().map_err(|e| AugmentError::output(path, e))
    }
}
