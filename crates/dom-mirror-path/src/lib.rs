//! Node paths for document trees.
//!
//! A [`NodePath`] addresses a node by the sequence of sibling positions that
//! leads to it from a root. Under the root itself only element children are
//! counted, so a leading doctype does not shift addresses; below that every
//! child counts, text and comments included.
//!
//! # Example
//!
//! ```
//! use dom_mirror_tree::DomTree;
//! use dom_mirror_path::{format_node_path, get_node_by_path, get_path};
//!
//! let tree = DomTree::parse_document("<!DOCTYPE html><p>a<b>c</b></p>");
//! let root = tree.document();
//! let p = tree.children(tree.body().unwrap())[0];
//! let b = tree.children(p)[1];
//!
//! let path = get_path(&tree, b, root).unwrap();
//! assert_eq!(format_node_path(&path), "/0/1/0/1");
//! assert_eq!(get_node_by_path(&tree, root, &path), Some(b));
//! ```

use dom_mirror_tree::{DomTree, NodeId};

pub mod types;
pub use types::{NodePath, PathError, PathStep};

pub mod find;
pub use find::{contains, get_path, get_path_with_fallback, try_get_path};

pub mod get;
pub use get::get_node_by_path;

/// Children of `parent` that take part in addressing.
pub(crate) fn siblings<'a>(
    tree: &'a DomTree,
    parent: NodeId,
    root: NodeId,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    if parent == root {
        Box::new(tree.element_children(parent))
    } else {
        Box::new(tree.children(parent).iter().copied())
    }
}

/// Formats a path as `/`-separated steps.
///
/// Returns an empty string for the root path.
///
/// # Example
///
/// ```
/// use dom_mirror_path::format_node_path;
///
/// assert_eq!(format_node_path(&[]), "");
/// assert_eq!(format_node_path(&[0, 3, 1]), "/0/3/1");
/// ```
pub fn format_node_path(path: &[PathStep]) -> String {
    let mut out = String::with_capacity(path.len() * 3);
    for step in path {
        out.push('/');
        out.push_str(&step.to_string());
    }
    out
}

/// Parses the output of [`format_node_path`].
///
/// # Example
///
/// ```
/// use dom_mirror_path::{parse_node_path, PathError};
///
/// assert_eq!(parse_node_path(""), Ok(vec![]));
/// assert_eq!(parse_node_path("/0/12"), Ok(vec![0, 12]));
/// assert_eq!(parse_node_path("0/1"), Ok(vec![0, 1]));
/// assert!(matches!(parse_node_path("/a"), Err(PathError::InvalidStep(_))));
/// ```
pub fn parse_node_path(text: &str) -> Result<NodePath, PathError> {
    let trimmed = text.strip_prefix('/').unwrap_or(text);
    if trimmed.is_empty() {
        return Ok(NodePath::new());
    }
    trimmed
        .split('/')
        .map(|step| {
            step.parse::<PathStep>()
                .map_err(|_| PathError::InvalidStep(step.to_owned()))
        })
        .collect()
}

/// Check if `parent` is a strict prefix of `child`.
///
/// # Example
///
/// ```
/// use dom_mirror_path::is_child;
///
/// assert!(is_child(&[0], &[0, 2]));
/// assert!(!is_child(&[0, 2], &[0, 2]));
/// assert!(!is_child(&[1], &[0, 2]));
/// ```
pub fn is_child(parent: &[PathStep], child: &[PathStep]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}
