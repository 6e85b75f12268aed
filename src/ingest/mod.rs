//! Export directory scanning
//!
//! Walks an already-extracted course export and sorts its files into the
//! inputs the triage pipeline needs. Traversal is sorted by file name so that
//! two scans of the same tree yield identical orderings.

use crate::extract::FileKind;
use crate::{Result, TriageError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Navigation manifest at the export root
pub const MANIFEST_FILE: &str = "imsmanifest.xml";

/// Content collection root, relative to the export root
pub const COLLECTION_DIR: [&str; 2] = ["csfiles", "home_dir"];

const METADATA_EXTENSION: &str = "xml";

/// Files of one extracted export, partitioned by role
#[derive(Debug, Clone, Default)]
pub struct ExportContents {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub collection_root: PathBuf,

    /// `.dat` content descriptors
    pub descriptors: Vec<PathBuf>,

    /// `.htm` / `.html` exported pages
    pub pages: Vec<PathBuf>,

    /// `.xml` metadata files (the manifest excluded)
    pub collection_files: Vec<PathBuf>,
}

impl ExportContents {
    /// Number of content items a run will process
    pub fn item_count(&self) -> usize {
        self.descriptors.len() + self.pages.len()
    }

    /// Location of a page inside the content collection
    ///
    /// Pages outside the collection root are given relative to the export root.
    pub fn collection_path(&self, page: &Path) -> String {
        let relative = page
            .strip_prefix(&self.collection_root)
            .or_else(|_| page.strip_prefix(&self.root))
            .unwrap_or(page);
        format!("/{}", relative.to_string_lossy().replace('\\', "/"))
    }
}

/// Scans an extracted export directory
///
/// # Arguments
///
/// * `root` - Directory the course archive was extracted into
///
/// # Returns
///
/// * `Ok(ExportContents)` - All content, page and metadata files found
/// * `Err(TriageError::Ingest)` - `root` is not a directory
pub fn scan_export(root: &Path) -> Result<ExportContents> {
    if !root.is_dir() {
        return Err(TriageError::Ingest {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let manifest = root.join(MANIFEST_FILE);
    let collection_root = COLLECTION_DIR.iter().fold(root.to_path_buf(), |p, c| p.join(c));

    let mut contents = ExportContents {
        root: root.to_path_buf(),
        manifest,
        collection_root,
        ..ExportContents::default()
    };

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        match FileKind::of(&path) {
            Some(FileKind::Descriptor) => contents.descriptors.push(path),
            Some(FileKind::Page) => contents.pages.push(path),
            None if is_metadata(&path) && path != contents.manifest => {
                contents.collection_files.push(path)
            }
            None => {}
        }
    }

    debug!(
        "Scanned {}: {} descriptors, {} pages, {} collection files",
        root.display(),
        contents.descriptors.len(),
        contents.pages.len(),
        contents.collection_files.len()
    );

    Ok(contents)
}

fn is_metadata(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == METADATA_EXTENSION)
}
