/// Content item model and report ordering
use crate::model::link::{Link, LinkCategory};
use std::cmp::Ordering;
use std::fmt;

/// Navigation path of an exported page that no descriptor deploys
pub const NOT_DEPLOYED: &str = "NOT DEPLOYED?";

/// The tool area a content descriptor belongs to
///
/// Descriptors can carry several markers at once; the first match in
/// declaration order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    Announcement,
    DiscussionForum,
    Assessment,
    #[default]
    Unclassified,
}

impl ContentType {
    /// Tool-area label used as the item's location in reports
    ///
    /// Unclassified items live in the navigation tree and have no label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Announcement => "Announcements",
            Self::DiscussionForum => "Discussion Forums",
            Self::Assessment => "Tests, Surveys & Pools",
            Self::Unclassified => "",
        }
    }

    /// Returns true for tool areas whose text is never scanned for links
    pub fn suppresses_text(&self) -> bool {
        matches!(self, Self::Announcement | Self::DiscussionForum)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Announcement => "announcement",
            Self::DiscussionForum => "discussion_forum",
            Self::Assessment => "assessment",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified => write!(f, "Unclassified"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Where a content item was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// A structured `.dat` content descriptor
    Descriptor,
    /// An exported HTML page in the content collection
    Page,
}

impl ItemSource {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Descriptor => "descriptor",
            Self::Page => "page",
        }
    }
}

/// One course content unit and the links found in it
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Lowercased file stem of the source file
    pub item_id: String,

    pub title: String,

    pub content_type: ContentType,

    pub source: ItemSource,

    /// Breadcrumb location, a tool-area label, or `NOT_DEPLOYED`
    pub navigation_path: String,

    /// Location inside the content collection (pages only)
    pub collection_path: String,

    pub hard_links: Vec<Link>,
    pub discarded_links: Vec<Link>,
    pub xid_links: Vec<Link>,
}

impl ContentItem {
    pub fn new(item_id: impl Into<String>, title: impl Into<String>, source: ItemSource) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            content_type: ContentType::Unclassified,
            source,
            navigation_path: String::new(),
            collection_path: String::new(),
            hard_links: Vec::new(),
            discarded_links: Vec::new(),
            xid_links: Vec::new(),
        }
    }

    /// Places links into their buckets, keeping the given order within each bucket
    pub fn push_links(&mut self, links: impl IntoIterator<Item = Link>) {
        for link in links {
            match link.category {
                LinkCategory::HardLink => self.hard_links.push(link),
                LinkCategory::Discarded => self.discarded_links.push(link),
                LinkCategory::XidLink => self.xid_links.push(link),
            }
        }
    }

    /// Returns false for pages no descriptor deploys
    pub fn is_deployed(&self) -> bool {
        self.navigation_path != NOT_DEPLOYED
    }

    pub fn total_links(&self) -> usize {
        self.hard_links.len() + self.discarded_links.len() + self.xid_links.len()
    }

    /// Report ordering: most hard links first
    pub fn compare_by_hard_links(&self, other: &Self) -> Ordering {
        other.hard_links.len().cmp(&self.hard_links.len())
    }
}

/// Sorts items by descending hard-link count; ties keep their relative order
pub fn sort_by_hard_links(items: &mut [ContentItem]) {
    items.sort_by(|a, b| a.compare_by_hard_links(b));
}
