//! Per-export triage results

use crate::model::{ContentItem, Link, LinkCategory};
use chrono::{DateTime, Utc};

/// Everything one run found in one export
#[derive(Debug, Clone)]
pub struct TriageReport {
    /// Export directory name
    pub export_name: String,

    /// Descriptor-backed items, most hard links first
    pub items: Vec<ContentItem>,

    /// Deployed HTML pages, most hard links first
    pub pages: Vec<ContentItem>,

    /// HTML pages no descriptor deploys
    pub undeployed: Vec<ContentItem>,

    /// Descriptors left out because they could not be read or parsed
    pub skipped: usize,

    pub config_hash: String,
    pub generated_at: DateTime<Utc>,
}

impl TriageReport {
    /// Items, then deployed pages, then undeployed pages
    pub fn all_items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .chain(self.pages.iter())
            .chain(self.undeployed.iter())
    }

    /// Every link of a category paired with the item it was found in
    pub fn links(&self, category: LinkCategory) -> impl Iterator<Item = (&ContentItem, &Link)> {
        self.all_items().flat_map(move |item| {
            let bucket = match category {
                LinkCategory::HardLink => &item.hard_links,
                LinkCategory::Discarded => &item.discarded_links,
                LinkCategory::XidLink => &item.xid_links,
            };
            bucket.iter().map(move |link| (item, link))
        })
    }

    pub fn count(&self, category: LinkCategory) -> usize {
        self.links(category).count()
    }

    /// Hard links whose resolution found no collection file
    pub fn unresolved_count(&self) -> usize {
        self.links(LinkCategory::HardLink)
            .filter(|(_, link)| link.is_unresolved())
            .count()
    }
}
