//! Streaming parser for `imsmanifest.xml`

use crate::manifest::tree::{NavigationTree, NodeId, NodeKind};
use crate::extract::read_lossy;
use crate::{ManifestError, ManifestResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// Loads the navigation tree from a manifest file
pub fn load_manifest(path: &Path) -> ManifestResult<NavigationTree> {
    let xml = read_lossy(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&xml)
}

/// Parses manifest XML into a navigation tree
///
/// Every `<organization>` and `<item>` element becomes a node. An item's
/// parent is its enclosing element when that element is itself a node; an
/// item nested inside anything else starts a new chain. A node's title is the
/// text of its first `<title>` child.
///
/// # Returns
///
/// * `Ok(NavigationTree)` - The tree, in document order
/// * `Err(ManifestError::Xml)` - The manifest is not well-formed
/// * `Err(ManifestError::Empty)` - The manifest contains no navigation nodes
pub fn parse_manifest(xml: &str) -> ManifestResult<NavigationTree> {
    let mut reader = Reader::from_str(xml);
    let mut tree = NavigationTree::new();
    let mut buf = Vec::new();

    // One entry per open element; Some when that element is a tree node
    let mut open: Vec<Option<NodeId>> = Vec::new();
    let mut titled: Vec<bool> = Vec::new();
    let mut title_target: Option<NodeId> = None;
    let mut title_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let node = start_node(&e, &mut tree, &open, &mut titled)?;
                if node.is_none() && e.name().as_ref() == b"title" {
                    title_target = open
                        .last()
                        .copied()
                        .flatten()
                        .filter(|id| !titled.get(*id).copied().unwrap_or(true));
                    title_text.clear();
                }
                open.push(node);
            }
            Ok(Event::Empty(e)) => {
                start_node(&e, &mut tree, &open, &mut titled)?;
            }
            Ok(Event::Text(e)) if title_target.is_some() => {
                let text = e.unescape().map_err(|err| ManifestError::Xml(err.to_string()))?;
                title_text.push_str(&text);
            }
            Ok(Event::CData(e)) if title_target.is_some() => {
                title_text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(e)) => {
                open.pop();
                if e.name().as_ref() == b"title" {
                    if let Some(id) = title_target.take() {
                        tree.set_title(id, std::mem::take(&mut title_text));
                        titled[id] = true;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ManifestError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if tree.is_empty() {
        return Err(ManifestError::Empty);
    }

    Ok(tree)
}

/// Adds a node for `<organization>`/`<item>` elements
fn start_node(
    element: &BytesStart<'_>,
    tree: &mut NavigationTree,
    open: &[Option<NodeId>],
    titled: &mut Vec<bool>,
) -> ManifestResult<Option<NodeId>> {
    let kind = match element.name().as_ref() {
        b"item" => NodeKind::Item,
        b"organization" => NodeKind::Organization,
        _ => return Ok(None),
    };

    let mut identifier_ref = None;
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ManifestError::Xml(e.to_string()))?;
        if attr.key.as_ref() == b"identifierref" {
            let value = attr
                .unescape_value()
                .map_err(|e| ManifestError::Xml(e.to_string()))?;
            identifier_ref = Some(value.to_string());
        }
    }

    let parent = open.last().copied().flatten();
    let id = tree.add_node(kind, "", identifier_ref.as_deref(), parent);
    titled.push(false);
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="man00001" xmlns:bb="http://www.blackboard.com/content-packaging/">
  <organizations default="toc00001">
    <organization identifier="toc00001">
      <item identifier="itm00001" identifierref="res00001">
        <title>--TOP--</title>
        <item identifier="itm00002" identifierref="res00002">
          <title>Course Content</title>
          <item identifier="itm00003" identifierref="res00003">
            <title>Unit 1 &amp; 2</title>
            <item identifier="itm00004" identifierref="res00004">
              <title>Reading</title>
            </item>
          </item>
        </item>
        <item identifier="itm00005" identifierref="res00005">
          <title>Syllabus</title>
        </item>
        <item identifier="itm00006" identifierref="res00006"/>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource bb:file="res00004.dat" bb:title="Reading" identifier="res00004" type="resource/x-bb-document"/>
  </resources>
</manifest>"#;

    #[test]
    fn test_parse_manifest_paths() {
        let tree = parse_manifest(MANIFEST).unwrap();
        assert_eq!(
            tree.resolve_path("res00004").as_deref(),
            Some("\\Course Content\\Unit 1 & 2\\")
        );
        assert_eq!(tree.resolve_path("res00005").as_deref(), Some("\\"));
        assert_eq!(tree.resolve_path("res00001").as_deref(), Some("\\"));
    }

    #[test]
    fn test_parse_manifest_titles() {
        let tree = parse_manifest(MANIFEST).unwrap();
        assert_eq!(tree.title_of("res00002"), Some("Course Content"));
        assert_eq!(tree.title_of("res00004"), Some("Reading"));
        // Self-closing item has no title
        assert_eq!(tree.title_of("res00006"), Some(""));
    }

    #[test]
    fn test_parse_manifest_structure() {
        let tree = parse_manifest(MANIFEST).unwrap();
        // organization + 6 items
        assert_eq!(tree.len(), 7);
        let org = tree.node(0).unwrap();
        assert_eq!(org.kind, NodeKind::Organization);
        assert_eq!(org.parent, None);
        assert_eq!(tree.node(1).unwrap().parent, Some(0));
    }

    #[test]
    fn test_resource_entries_are_not_nodes() {
        let tree = parse_manifest(MANIFEST).unwrap();
        assert!(tree.find("res99999").is_none());
        assert!((0..tree.len()).all(|id| tree.node(id).unwrap().content_item_id.is_some()
            || tree.node(id).unwrap().kind == NodeKind::Organization));
    }

    #[test]
    fn test_malformed_manifest() {
        let result = parse_manifest("<manifest><organization></manifest>");
        assert!(matches!(result, Err(ManifestError::Xml(_))));
    }

    #[test]
    fn test_manifest_without_nodes() {
        let result = parse_manifest("<manifest><resources/></manifest>");
        assert!(matches!(result, Err(ManifestError::Empty)));
    }

    #[test]
    fn test_load_manifest_tolerates_invalid_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("imsmanifest.xml");
        let mut xml = b"<manifest><organization><item identifierref=\"res00002\"><title>Cr".to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(
            b"dits</title><item identifierref=\"res00003\"><title>Intro</title></item></item></organization></manifest>",
        );
        std::fs::write(&path, xml).unwrap();

        let tree = load_manifest(&path).unwrap();
        assert_eq!(tree.title_of("res00002"), Some("Cr\u{FFFD}dits"));
        assert_eq!(
            tree.resolve_path("res00003").as_deref(),
            Some("\\Cr\u{FFFD}dits\\")
        );
    }
}
