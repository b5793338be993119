//! Page tree implementation.

use crate::node::{Node, NodeId};
use common::{PlayerError, PlayerResult};
use slotmap::SlotMap;

/// The host page tree.
pub struct PageTree {
    /// All nodes in the tree.
    nodes: SlotMap<NodeId, Node>,
    /// Root document node.
    root: NodeId,
}

impl PageTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(|id| Node::new(id, "document"));
        Self { nodes, root }
    }

    /// Get the root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the tree contains a node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let tag = tag.into();
        self.nodes.insert_with_key(|id| Node::new(id, tag))
    }

    /// Create an element with a debug label.
    pub fn create_labeled(&mut self, tag: impl Into<String>, label: impl Into<String>) -> NodeId {
        let id = self.create_element(tag);
        // Node was just inserted.
        if let Some(node) = self.nodes.get_mut(id) {
            node.label = Some(label.into());
        }
        id
    }

    /// Append a child to a parent node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> PlayerResult<()> {
        if !self.nodes.contains_key(parent) {
            return Err(PlayerError::node_not_found(format!("parent {parent:?}")));
        }
        if !self.nodes.contains_key(child) {
            return Err(PlayerError::node_not_found(format!("child {child:?}")));
        }

        self.detach(child);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach a node from its parent, keeping it in the tree.
    pub fn detach(&mut self, id: NodeId) {
        let parent = self.nodes.get(id).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// Iterate a node's ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.nodes.get(next).and_then(|n| n.parent);
            Some(next)
        })
    }

    /// Whether `ancestor` contains `node` (inclusive).
    pub fn is_inside(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Propagation path for an event target: target first, root last.
    pub fn propagation_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        if self.nodes.contains_key(target) {
            path.push(target);
            path.extend(self.ancestors(target));
        }
        path
    }
}

impl Default for PageTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_path() {
        let mut tree = PageTree::new();
        let overlay = tree.create_element("div");
        let button = tree.create_element("button");
        tree.append_child(tree.root(), overlay).unwrap();
        tree.append_child(overlay, button).unwrap();

        let path = tree.propagation_path(button);
        assert_eq!(path, vec![button, overlay, tree.root()]);
        assert!(tree.is_inside(button, overlay));
        assert!(tree.is_inside(button, tree.root()));
        assert!(!tree.is_inside(overlay, button));
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = PageTree::new();
        let overlay = tree.create_element("div");
        let button = tree.create_element("button");
        tree.append_child(tree.root(), overlay).unwrap();
        tree.append_child(overlay, button).unwrap();

        tree.remove(overlay);
        assert!(!tree.contains(overlay));
        assert!(!tree.contains(button));
        assert!(tree.contains(tree.root()));
    }

    #[test]
    fn test_append_removed_parent() {
        let mut tree = PageTree::new();
        let gone = tree.create_element("div");
        let child = tree.create_element("div");
        tree.remove(gone);
        assert!(tree.append_child(gone, child).is_err());
    }
}
