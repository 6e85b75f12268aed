//! Course navigation manifest
//!
//! This module loads the export's `imsmanifest.xml` into an arena-backed
//! navigation tree and maps content items back to their breadcrumb location.
//!
//! # Components
//!
//! - `NavigationTree`: arena of manifest nodes with parent indices
//! - `parse_manifest` / `load_manifest`: streaming manifest parser
//! - `resolve_path`: breadcrumb lookup with the `NOT_DEPLOYED` fallback

mod parser;
mod tree;

pub use parser::{load_manifest, parse_manifest};
pub use tree::{ManifestNode, NavigationTree, NodeId, NodeKind, PATH_SEPARATOR, ROOT_MARKER};

use crate::model::NOT_DEPLOYED;

/// Resolves the navigation path for an item's backing descriptor
///
/// Items with no backing descriptor at all are `NOT_DEPLOYED`. A descriptor
/// with no navigation node yields an empty path: it exists in the course but
/// is not reachable from the menu.
///
/// # Examples
///
/// ```
/// use course_triage::manifest::{resolve_path, NavigationTree, NodeKind};
/// use course_triage::NOT_DEPLOYED;
///
/// let mut tree = NavigationTree::new();
/// let org = tree.add_node(NodeKind::Organization, "", None, None);
/// let top = tree.add_node(NodeKind::Item, "--TOP--", None, Some(org));
/// let week = tree.add_node(NodeKind::Item, "Week 1", Some("res00002"), Some(top));
/// tree.add_node(NodeKind::Item, "Reading", Some("res00010"), Some(week));
///
/// assert_eq!(resolve_path(&tree, Some("RES00010")), "\\Week 1\\");
/// assert_eq!(resolve_path(&tree, Some("res99999")), "");
/// assert_eq!(resolve_path(&tree, None), NOT_DEPLOYED);
/// ```
pub fn resolve_path(tree: &NavigationTree, descriptor_id: Option<&str>) -> String {
    match descriptor_id {
        None => NOT_DEPLOYED.to_string(),
        Some(id) => tree.resolve_path(id).unwrap_or_default(),
    }
}
