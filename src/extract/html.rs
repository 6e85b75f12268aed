//! Exported HTML page reading

use crate::extract::read_lossy;
use crate::{ExtractError, ExtractResult};
use std::path::Path;

/// Marker the platform appends to exported file names before the stable id
const XID_SUFFIX_MARKER: &str = "__xid";

/// Reads a page verbatim with its line breaks removed
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Bytes that are not valid
/// UTF-8 are replaced rather than failing the page.
pub fn page_text(path: &Path) -> ExtractResult<String> {
    let text = read_lossy(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(text.split(['\r', '\n']).collect())
}

/// Derives a page title from its file name, dropping any trailing `__xid...` segment
///
/// # Examples
///
/// ```
/// use course_triage::extract::page_title;
///
/// assert_eq!(page_title("week1__xid-1234567_1.html"), "week1");
/// assert_eq!(page_title("week1.html"), "week1.html");
/// ```
pub fn page_title(file_name: &str) -> String {
    match file_name.rfind(XID_SUFFIX_MARKER) {
        Some(index) => file_name[..index].to_string(),
        None => file_name.to_string(),
    }
}
