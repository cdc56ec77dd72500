//! Type definitions for node paths.

use dom_mirror_tree::NodeId;
use thiserror::Error;

/// A step in a node path: the index of a node among its siblings.
pub type PathStep = usize;

/// An address of a node relative to a tree root. Empty addresses the root.
pub type NodePath = Vec<PathStep>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// Walking up from the node never reached the root.
    #[error("node {node} is not a descendant of {root}")]
    NotDescendant { node: NodeId, root: NodeId },
    /// The node has a parent but is absent from the sibling set used for
    /// addressing, e.g. a comment directly under the root, where only
    /// elements are counted.
    #[error("node {node} is not addressable among the children of {parent}")]
    NotInSiblingSet { node: NodeId, parent: NodeId },
    #[error("invalid path step: {0:?}")]
    InvalidStep(String),
}
