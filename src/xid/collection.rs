//! Content collection metadata index

use crate::extract::read_lossy;
use crate::{ExtractError, ExtractResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One collection metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFile {
    /// File name of the metadata file (`page.html.xml`)
    pub file_name: String,

    pub path: PathBuf,

    /// Raw identifier, formatted `numericId#declaredPath`
    pub identifier: String,
}

impl CollectionFile {
    /// The stable id: everything before the first `#`
    pub fn stable_id(&self) -> &str {
        self.identifier.split('#').next().unwrap_or_default()
    }

    /// The declared path after the first `#`; empty when there is none
    pub fn declared_path(&self) -> &str {
        self.identifier.split('#').nth(1).unwrap_or_default()
    }
}

/// Read-only index over a run's collection metadata files
///
/// Candidates for a file name come back in the order the files were added.
#[derive(Debug, Default)]
pub struct CollectionIndex {
    files: Vec<CollectionFile>,
    by_name: HashMap<String, Vec<usize>>,
}

impl CollectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the identifier of every given metadata file
    ///
    /// Files that cannot be read or parsed, or that carry no identifier, are
    /// logged and left out.
    pub fn load<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut index = Self::new();
        let mut buf = Vec::new();
        let mut skipped = 0;

        for path in paths {
            match read_identifier(path, &mut buf) {
                Ok(Some(identifier)) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    index.insert(CollectionFile {
                        file_name,
                        path: path.to_path_buf(),
                        identifier,
                    });
                }
                Ok(None) => {
                    debug!("No identifier in {}", path.display());
                    skipped += 1;
                }
                Err(e) => {
                    warn!("Skipping collection file: {}", e);
                    skipped += 1;
                }
            }
        }

        debug!(
            "Indexed {} collection files ({} skipped)",
            index.len(),
            skipped
        );
        index
    }

    /// Builds an index from already-parsed files
    pub fn from_files(files: impl IntoIterator<Item = CollectionFile>) -> Self {
        let mut index = Self::new();
        for file in files {
            index.insert(file);
        }
        index
    }

    pub fn insert(&mut self, file: CollectionFile) {
        self.by_name
            .entry(file.file_name.clone())
            .or_default()
            .push(self.files.len());
        self.files.push(file);
    }

    /// Files whose name equals `file_name` exactly
    pub fn candidates(&self, file_name: &str) -> Vec<&CollectionFile> {
        self.by_name
            .get(file_name)
            .map(|ids| ids.iter().map(|&i| &self.files[i]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionFile> {
        self.files.iter()
    }
}

fn read_identifier(path: &Path, buf: &mut Vec<u8>) -> ExtractResult<Option<String>> {
    let xml = read_lossy(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_identifier(&xml, path, buf)
}

/// Returns the text of the first `<identifier>` element
///
/// Nested markup inside the element contributes its text.
pub fn parse_identifier(xml: &str, path: &Path, buf: &mut Vec<u8>) -> ExtractResult<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut text = String::new();
    buf.clear();

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(e)) => {
                if depth > 0 {
                    depth += 1;
                } else if e.name().as_ref() == b"identifier" {
                    depth = 1;
                }
            }
            Ok(Event::Empty(e)) if depth == 0 && e.name().as_ref() == b"identifier" => {
                return Ok(Some(String::new()));
            }
            Ok(Event::Text(e)) if depth > 0 => {
                let chunk = e.unescape().map_err(|err| xml_error(path, err))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(e)) if depth > 0 => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(text));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xml_error(path, e)),
            _ => {}
        }
        buf.clear();
    }
}

fn xml_error(path: &Path, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
