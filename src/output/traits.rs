//! Report writer trait and errors

use crate::pipeline::TriageReport;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report: {0}")]
    Write(String),

    #[error("Invalid report setting: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A report format
///
/// Writers render a finished `TriageReport`; they never change it.
pub trait ReportWriter {
    /// File extension of the written report, without the dot
    fn extension(&self) -> &'static str;

    /// Writes the report to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `report` - Results of one export
    /// * `path` - Destination file
    fn write(&self, report: &TriageReport, path: &Path) -> OutputResult<()>;
}
