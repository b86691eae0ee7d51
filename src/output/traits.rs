//! Output traits and types
//!
//! This module defines the sink interface the session persists records
//! through, the errors it can raise, and the readback report of a written
//! file.

use crate::model::ProductRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output directory unusable: {0}")]
    OutputDir(String),

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted records
pub trait RecordSink: Send + Sync {
    /// Persists `records` and returns the path written
    ///
    /// When `filename` is `None` the sink picks a timestamped name.
    fn write_records(
        &self,
        records: &[ProductRecord],
        filename: Option<&str>,
    ) -> OutputResult<PathBuf>;

    /// Reads a written file back and reports on its contents
    fn verify(&self, path: &Path) -> OutputResult<FileReport>;
}

/// Readback summary of a written file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The file inspected
    pub path: PathBuf,

    /// Size on disk in bytes
    pub size_bytes: u64,

    /// Rows after the header
    pub data_rows: usize,

    /// The header row, empty if the file has no rows
    pub header: Vec<String>,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved file check:")?;
        writeln!(f, "  File path: {}", self.path.display())?;
        writeln!(f, "  File size: {} bytes", self.size_bytes)?;
        writeln!(f, "  Data rows: {}", self.data_rows)?;
        if self.header.is_empty() {
            write!(f, "  Header: none")
        } else {
            write!(f, "  Header: {}", self.header.join(", "))
        }
    }
}
