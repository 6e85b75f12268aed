//! Arena-backed navigation tree

/// Title of the synthetic root item, never shown in a path
pub const ROOT_MARKER: &str = "--TOP--";

/// Breadcrumb separator
pub const PATH_SEPARATOR: char = '\\';

/// Index of a node in the tree arena
pub type NodeId = usize;

/// Manifest element a node was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An `<organization>`: the menu container, never part of a path
    Organization,
    /// An `<item>`: a menu entry or folder
    Item,
}

/// One navigation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestNode {
    pub kind: NodeKind,
    pub title: String,
    /// Descriptor id this entry points at (`identifierref`)
    pub content_item_id: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The course's navigation forest
///
/// Nodes are stored in document order, so a linear scan visits them in the
/// same order as the manifest.
#[derive(Debug, Clone, Default)]
pub struct NavigationTree {
    nodes: Vec<ManifestNode>,
}

impl NavigationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node under `parent` and returns its id
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        title: impl Into<String>,
        content_item_id: Option<&str>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ManifestNode {
            kind,
            title: title.into(),
            content_item_id: content_item_id.map(str::to_string),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    pub(crate) fn set_title(&mut self, id: NodeId, title: String) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.title = title;
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&ManifestNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Finds the first item that references `content_item_id` (case-insensitive)
    pub fn find(&self, content_item_id: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| {
            node.kind == NodeKind::Item
                && node
                    .content_item_id
                    .as_deref()
                    .is_some_and(|id| id.eq_ignore_ascii_case(content_item_id))
        })
    }

    /// Builds the breadcrumb of a node's item ancestors
    ///
    /// The node's own title is not part of its path. The walk stops at the
    /// first ancestor that is not an item, skips the root marker, and the
    /// result always ends with a separator.
    pub fn path_to(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);

        while let Some(node) = current.and_then(|p| self.nodes.get(p)) {
            if node.kind != NodeKind::Item {
                break;
            }
            if node.title != ROOT_MARKER {
                segments.push(node.title.as_str());
            }
            current = node.parent;
        }

        let mut path = String::new();
        for segment in segments.iter().rev() {
            path.push(PATH_SEPARATOR);
            path.push_str(segment);
        }
        path.push(PATH_SEPARATOR);
        path
    }

    /// Breadcrumb for the first item referencing `content_item_id`
    pub fn resolve_path(&self, content_item_id: &str) -> Option<String> {
        self.find(content_item_id).map(|id| self.path_to(id))
    }

    /// Title of the first item referencing `content_item_id`
    pub fn title_of(&self, content_item_id: &str) -> Option<&str> {
        self.find(content_item_id)
            .and_then(|id| self.nodes.get(id))
            .map(|n| n.title.as_str())
    }
}
