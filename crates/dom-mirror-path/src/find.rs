//! Node → path.

use dom_mirror_tree::{DomTree, NodeId};

use crate::siblings;
use crate::types::{NodePath, PathError};

/// Computes the path of `node` relative to `root`.
///
/// Sibling positions are taken among element children when the parent is
/// `root`, and among all children otherwise.
pub fn try_get_path(tree: &DomTree, node: NodeId, root: NodeId) -> Result<NodePath, PathError> {
    let mut path = NodePath::new();
    let mut current = node;
    while current != root {
        let parent = tree
            .parent(current)
            .ok_or(PathError::NotDescendant { node, root })?;
        let index = siblings(tree, parent, root)
            .position(|sibling| sibling == current)
            .ok_or(PathError::NotInSiblingSet {
                node: current,
                parent,
            })?;
        path.push(index);
        current = parent;
    }
    path.reverse();
    Ok(path)
}

/// Path of `node`, or `None` when it cannot be addressed from `root`.
pub fn get_path(tree: &DomTree, node: NodeId, root: NodeId) -> Option<NodePath> {
    try_get_path(tree, node, root).ok()
}

/// Like [`get_path`], but a node missing from its sibling set is addressed as
/// its parent's first child instead of failing.
///
/// The substituted step points at a different node, so a replica applying a
/// patch built from it may diverge. Each substitution is logged.
pub fn get_path_with_fallback(tree: &DomTree, node: NodeId, root: NodeId) -> Option<NodePath> {
    let mut path = NodePath::new();
    let mut current = node;
    while current != root {
        let parent = tree.parent(current)?;
        let index = match siblings(tree, parent, root).position(|sibling| sibling == current) {
            Some(index) => index,
            None => {
                tracing::warn!(%current, %parent, "node missing from sibling set, substituting index 0");
                0
            }
        };
        path.push(index);
        current = parent;
    }
    path.reverse();
    Some(path)
}

/// Whether `node` is `root` or one of its descendants.
pub fn contains(tree: &DomTree, root: NodeId, node: NodeId) -> bool {
    tree.contains(root, node)
}
