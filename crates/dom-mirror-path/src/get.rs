//! Path → node.

use dom_mirror_tree::{DomTree, NodeId};

use crate::siblings;

/// Resolves `path` against `root`.
///
/// Uses the same sibling sets as [`crate::get_path`]; returns `None` when any
/// step is out of range.
pub fn get_node_by_path(tree: &DomTree, root: NodeId, path: &[usize]) -> Option<NodeId> {
    let mut current = root;
    for &step in path {
        current = siblings(tree, current, root).nth(step)?;
    }
    Some(current)
}
