//! Triage pipeline for one course export
//!
//! Runs every content item through extraction, link classification, x-id
//! resolution and path resolution, in that order:
//! 1. Scan the export and load the navigation manifest and collection index
//! 2. Triage all `.dat` descriptors, remembering which page each one deploys
//! 3. Triage all exported HTML pages against that deployment map
//! 4. Sort both lists and split off undeployed pages
//!
//! Items are independent of each other; the only shared inputs are the
//! read-only manifest tree and collection index.

mod report;

pub use report::TriageReport;

use crate::classify::classify_links;
use crate::config::Config;
use crate::extract::{Extracted, TextExtractor};
use crate::ingest::{scan_export, ExportContents};
use crate::manifest::{load_manifest, resolve_path, NavigationTree};
use crate::model::{sort_by_hard_links, ContentItem, ContentType, ItemSource};
use crate::xid::{CollectionIndex, XidResolver};
use crate::{Result, TriageError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Triages one extracted course export
///
/// # Arguments
///
/// * `root` - The extracted export directory
/// * `config` - Validated configuration
/// * `config_hash` - Hash recorded in the report
/// * `cancel` - Checked before each item; once set the run stops
///
/// # Returns
///
/// * `Ok(TriageReport)` - All items that could be read
/// * `Err(TriageError::Cancelled)` - `cancel` was set before the run finished
/// * `Err(TriageError)` - The export could not be scanned, or its manifest read
pub fn process_export(
    root: &Path,
    config: &Config,
    config_hash: &str,
    cancel: &AtomicBool,
) -> Result<TriageReport> {
    let contents = scan_export(root)?;
    process_contents(&contents, config, config_hash, cancel)
}

/// Triages an already scanned export
pub fn process_contents(
    contents: &ExportContents,
    config: &Config,
    config_hash: &str,
    cancel: &AtomicBool,
) -> Result<TriageReport> {
    let export_name = contents
        .root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(
        "Triaging {} ({} descriptors, {} pages)",
        export_name,
        contents.descriptors.len(),
        contents.pages.len()
    );

    let tree = load_manifest(&contents.manifest)?;
    tracing::debug!("Loaded navigation tree with {} nodes", tree.len());

    let index = CollectionIndex::load(contents.collection_files.iter().map(PathBuf::as_path));
    tracing::info!("Indexed {} collection files", index.len());

    let resolver = XidResolver::new(&config.platform)?;
    let mut triage = Triage {
        contents,
        tree: &tree,
        index: &index,
        resolver: &resolver,
        base_url: &config.platform.base_url,
        extractor: TextExtractor::new(),
        deployed_by: HashMap::new(),
        skipped: 0,
    };

    let mut remaining = contents.item_count();

    let mut items = Vec::with_capacity(contents.descriptors.len());
    for path in &contents.descriptors {
        check_cancelled(cancel, remaining)?;
        remaining -= 1;
        if let Some(item) = triage.descriptor(path) {
            items.push(item);
        }
    }

    let mut pages = Vec::with_capacity(contents.pages.len());
    for path in &contents.pages {
        check_cancelled(cancel, remaining)?;
        remaining -= 1;
        if let Some(item) = triage.page(path) {
            pages.push(item);
        }
    }

    sort_by_hard_links(&mut items);
    sort_by_hard_links(&mut pages);
    let (pages, undeployed): (Vec<_>, Vec<_>) =
        pages.into_iter().partition(ContentItem::is_deployed);

    let report = TriageReport {
        export_name,
        items,
        pages,
        undeployed,
        skipped: triage.skipped,
        config_hash: config_hash.to_string(),
        generated_at: chrono::Utc::now(),
    };

    tracing::info!(
        "Finished {}: {} items, {} pages, {} undeployed, {} skipped",
        report.export_name,
        report.items.len(),
        report.pages.len(),
        report.undeployed.len(),
        report.skipped
    );

    Ok(report)
}

fn check_cancelled(cancel: &AtomicBool, remaining: usize) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        return Err(TriageError::Cancelled { remaining });
    }
    Ok(())
}

/// Per-run state shared by all items
struct Triage<'a> {
    contents: &'a ExportContents,
    tree: &'a NavigationTree,
    index: &'a CollectionIndex,
    resolver: &'a XidResolver,
    base_url: &'a str,
    extractor: TextExtractor,
    /// Page file name -> id of the first descriptor deploying it
    deployed_by: HashMap<String, String>,
    skipped: usize,
}

impl Triage<'_> {
    fn descriptor(&mut self, path: &Path) -> Option<ContentItem> {
        let extracted = self.extract(path)?;
        let item_id = item_id(path);

        if let Some(page) = &extracted.file_link {
            self.deployed_by
                .entry(page.clone())
                .or_insert_with(|| item_id.clone());
        }

        let navigation_path = match extracted.content_type {
            ContentType::Unclassified => resolve_path(self.tree, Some(&item_id)),
            typed => typed.label().to_string(),
        };

        let mut item = self.build(item_id, ItemSource::Descriptor, extracted);
        item.navigation_path = navigation_path;

        tracing::debug!(
            "{} '{}': {} hard links",
            item.item_id,
            item.title,
            item.hard_links.len()
        );
        Some(item)
    }

    fn page(&mut self, path: &Path) -> Option<ContentItem> {
        let extracted = self.extract(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let descriptor_id = self.deployed_by.get(&file_name).map(String::as_str);

        let navigation_path = resolve_path(self.tree, descriptor_id);
        let node_title = descriptor_id.and_then(|id| self.tree.title_of(id));

        let mut item = self.build(item_id(path), ItemSource::Page, extracted);
        if let Some(title) = node_title {
            item.title = title.to_string();
        }
        item.navigation_path = navigation_path;
        item.collection_path = self.contents.collection_path(path);

        tracing::debug!(
            "{} '{}': {} hard links ({})",
            item.collection_path,
            item.title,
            item.hard_links.len(),
            item.navigation_path
        );
        Some(item)
    }

    /// Extracts a file; failures skip the item
    fn extract(&mut self, path: &Path) -> Option<Extracted> {
        match self.extractor.extract(path) {
            Ok(extracted) => Some(extracted),
            Err(e) => {
                tracing::warn!("Skipping item: {}", e);
                self.skipped += 1;
                None
            }
        }
    }

    /// Classifies the item's links and resolves the ones that ask for it
    fn build(&self, item_id: String, source: ItemSource, extracted: Extracted) -> ContentItem {
        let mut item = ContentItem::new(item_id, extracted.title, source);
        item.content_type = extracted.content_type;

        let links = classify_links(&extracted.raw_text, item.content_type, self.base_url)
            .into_iter()
            .map(|classified| {
                let mut link = classified.link;
                if classified.needs_resolution {
                    link.resolved_xid = Some(self.resolver.resolve(&link.url, self.index));
                }
                link
            });
        item.push_links(links);
        item
    }
}

/// Lowercased file stem
fn item_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkCategory, NOT_DEPLOYED, NOT_FOUND_IN_COLLECTION};
    use tempfile::TempDir;

    const MANIFEST: &str = r#"<manifest>
  <organizations>
    <organization identifier="toc00001">
      <item identifier="itm00001" identifierref="res00001">
        <title>--TOP--</title>
        <item identifier="itm00002" identifierref="res00002">
          <title>Week 1</title>
          <item identifier="itm00003" identifierref="res00003">
            <title>Syllabus Page</title>
          </item>
        </item>
      </item>
    </organization>
  </organizations>
</manifest>"#;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn export() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "imsmanifest.xml", MANIFEST);
        write(
            root,
            "res00003.dat",
            r#"<CONTENT><TITLE value="Syllabus"/>
                <CONTENTHANDLER value="resource/x-bb-file"/>
                <FILES><FILE><LINKNAME value="syllabus.html"/></FILE></FILES>
               </CONTENT>"#,
        );
        write(
            root,
            "res00004.dat",
            r#"<ANNOUNCEMENT><TITLE value="Welcome"/><DESCRIPTION><TEXT>&lt;a href="page.html"&gt;x&lt;/a&gt;</TEXT></DESCRIPTION></ANNOUNCEMENT>"#,
        );
        write(root, "res00005.dat", "<CONTENT><TITLE value=\"Broken\"></CONTENT>");
        write(
            root,
            "csfiles/home_dir/syllabus.html",
            r#"<a href="mycontent/page.html">Page</a>"#,
        );
        write(root, "csfiles/home_dir/orphan.html", "<p>nothing</p>");
        dir
    }

    fn run(root: &Path) -> Result<TriageReport> {
        process_export(root, &Config::default(), "hash", &AtomicBool::new(false))
    }

    #[test]
    fn test_process_export() {
        let dir = export();
        let report = run(dir.path()).unwrap();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.config_hash, "hash");

        let announcement = report
            .items
            .iter()
            .find(|i| i.item_id == "res00004")
            .unwrap();
        assert_eq!(announcement.navigation_path, "Announcements");
        assert_eq!(announcement.total_links(), 0);

        let syllabus_item = report
            .items
            .iter()
            .find(|i| i.item_id == "res00003")
            .unwrap();
        assert_eq!(syllabus_item.navigation_path, "\\Week 1\\");

        assert_eq!(report.pages.len(), 1);
        let page = &report.pages[0];
        assert_eq!(page.title, "Syllabus Page");
        assert_eq!(page.navigation_path, "\\Week 1\\");
        assert_eq!(page.collection_path, "/syllabus.html");
        assert_eq!(page.hard_links.len(), 1);
        assert_eq!(
            page.hard_links[0].resolved_xid.as_deref(),
            Some(NOT_FOUND_IN_COLLECTION)
        );

        assert_eq!(report.undeployed.len(), 1);
        assert_eq!(report.undeployed[0].navigation_path, NOT_DEPLOYED);
        assert_eq!(report.undeployed[0].title, "orphan.html");
        assert_eq!(report.count(LinkCategory::HardLink), 1);
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = export();
        std::fs::remove_file(dir.path().join("imsmanifest.xml")).unwrap();
        assert!(matches!(run(dir.path()), Err(TriageError::Manifest(_))));
    }

    #[test]
    fn test_cancelled_before_first_item() {
        let dir = export();
        let result = process_export(dir.path(), &Config::default(), "", &AtomicBool::new(true));
        assert!(matches!(result, Err(TriageError::Cancelled { remaining: 5 })));
    }

    #[test]
    fn test_item_id_is_lowercased_stem() {
        assert_eq!(item_id(Path::new("/x/RES00001.dat")), "res00001");
        assert_eq!(item_id(Path::new("Page.HTML")), "page");
    }
}
