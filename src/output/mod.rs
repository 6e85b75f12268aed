//! Report output
//!
//! This module renders a finished `TriageReport`:
//! - A markdown report with one table per view
//! - A SQLite database holding every item and link
//! - Console statistics

mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, MarkdownReport, CLEAN_PAGE_NOTE, CLEAN_UNDEPLOYED_NOTE};
pub use sqlite_output::{initialize_schema, SqliteReport, REPORT_SCHEMA_SQL};
pub use stats::{print_statistics, TriageStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::config::ReportConfig;
use crate::pipeline::TriageReport;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Export name fragment replaced in report file names
const EXPORT_MARKER: &str = "ExportFile";
const REPORT_MARKER: &str = "triage";

/// Report file stem for an export directory name
///
/// # Examples
///
/// ```
/// use course_triage::output::report_stem;
///
/// assert_eq!(report_stem("ExportFile_ABC101_2024"), "triage_ABC101_2024");
/// assert_eq!(report_stem("course"), "course");
/// ```
pub fn report_stem(export_name: &str) -> String {
    export_name.replace(EXPORT_MARKER, REPORT_MARKER)
}

/// Writers enabled by the report configuration
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn ReportWriter>>)` - Possibly empty
/// * `Err(OutputError::Format)` - The skip pattern does not compile
pub fn configured_writers(config: &ReportConfig) -> OutputResult<Vec<Box<dyn ReportWriter>>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = Vec::new();

    if config.write_markdown {
        let skip = Regex::new(&config.skip_name_pattern)
            .map_err(|e| OutputError::Format(format!("skip-name-pattern: {}", e)))?;
        writers.push(Box::new(MarkdownReport::new(skip)));
    }
    if config.write_database {
        writers.push(Box::new(SqliteReport));
    }

    Ok(writers)
}

/// Writes every configured report for one export
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written files
/// * `Err(OutputError)` - A report could not be written
pub fn write_reports(report: &TriageReport, config: &ReportConfig) -> OutputResult<Vec<PathBuf>> {
    let output_dir = Path::new(&config.output_dir);
    std::fs::create_dir_all(output_dir)?;

    let stem = report_stem(&report.export_name);
    let mut written = Vec::new();

    for writer in configured_writers(config)? {
        let path = output_dir.join(format!("{}.{}", stem, writer.extension()));
        writer.write(report, &path)?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
