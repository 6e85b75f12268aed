//! Text extraction for course content files
//!
//! Turns a content file into the `(title, content type, assessment type, text)`
//! tuple the link classifier works on. Two kinds of files are handled:
//! - `.dat` content descriptors (structured XML, parsed with quick-xml)
//! - `.htm`/`.html` pages exported into the content collection (read verbatim)

mod descriptor;
mod html;

pub use descriptor::parse_descriptor;
pub use html::{page_text, page_title};

use crate::model::ContentType;
use crate::{ExtractError, ExtractResult};
use std::path::Path;

/// Normalized output of the text extractor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Display title; assessments carry their sub-type prefix ("Survey: Midterm")
    pub title: String,

    pub content_type: ContentType,

    /// Assessment sub-type ("Test", "Survey", "Pool"), when present
    pub assessment_type: Option<String>,

    /// Markup to scan for links; always empty for announcements and forums
    pub raw_text: String,

    /// Collection file name this descriptor deploys, if it is a file link
    pub file_link: Option<String>,
}

/// Reads a file as text, replacing invalid UTF-8 with U+FFFD
///
/// Older exports mix in Windows-1252 bytes; one stray byte must not cost the
/// whole item.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Kind of content file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Descriptor,
    Page,
}

impl FileKind {
    /// Returns the kind for a path, or None for files the extractor ignores
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("dat") => Some(Self::Descriptor),
            Some("htm") | Some("html") => Some(Self::Page),
            _ => None,
        }
    }
}

/// Reusable extractor
///
/// Holds the XML event buffer so that one instance can be reused across all
/// items of a run instead of reallocating per file.
#[derive(Debug, Default)]
pub struct TextExtractor {
    buf: Vec<u8>,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts a content file of either kind
    ///
    /// # Returns
    ///
    /// * `Ok(Extracted)` - The normalized triple plus metadata
    /// * `Err(ExtractError)` - The file is unreadable or its XML is malformed;
    ///   the caller skips this one item
    pub fn extract(&mut self, path: &Path) -> ExtractResult<Extracted> {
        match FileKind::of(path) {
            Some(FileKind::Descriptor) => {
                let xml = read_lossy(path).map_err(|source| ExtractError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.extract_descriptor(&xml, path)
            }
            Some(FileKind::Page) => {
                let raw_text = page_text(path)?;
                let title = path
                    .file_name()
                    .map(|n| page_title(&n.to_string_lossy()))
                    .unwrap_or_default();
                Ok(Extracted {
                    title,
                    raw_text,
                    ..Extracted::default()
                })
            }
            None => Err(ExtractError::Unsupported(path.to_path_buf())),
        }
    }

    /// Extracts an in-memory descriptor; `path` is only used in error messages
    pub fn extract_descriptor(&mut self, xml: &str, path: &Path) -> ExtractResult<Extracted> {
        parse_descriptor(xml, path, &mut self.buf)
    }
}
