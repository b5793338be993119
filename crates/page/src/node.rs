//! Page node implementation.

use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a page node.
    pub struct NodeId;
}

/// A node in the host page tree.
///
/// The host only needs enough structure to route input events and mark its
/// own control surface; there is no attribute or style model here.
#[derive(Clone, Debug)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Tag name ("div", "button", "iframe", "document").
    pub tag: String,
    /// Optional debug label ("back-button", "server-menu").
    pub label: Option<String>,
    /// Parent node.
    pub parent: Option<NodeId>,
    /// Child nodes.
    pub children: SmallVec<[NodeId; 8]>,
}

impl Node {
    pub(crate) fn new(id: NodeId, tag: impl Into<String>) -> Self {
        Self {
            id,
            tag: tag.into(),
            label: None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Whether this is the document root.
    pub fn is_document(&self) -> bool {
        self.tag == "document"
    }
}
