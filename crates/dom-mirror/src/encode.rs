//! Live member calls → [`Patch`].

use dom_mirror_path::{get_path_with_fallback, try_get_path, NodePath, PathError};
use dom_mirror_tree::{Arg, DomTree, Member, NodeData, NodeId, NodeKind};
use indexmap::IndexMap;
use thiserror::Error;

use crate::patch::{Patch, SerializedArg, SerializedNode};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("UNREACHABLE: target {node} of {member} is not part of the observed tree")]
    Unreachable { node: NodeId, member: Member },
    #[error("UNADDRESSABLE: {0}")]
    Unaddressable(#[from] PathError),
    #[error("UNSERIALIZABLE: {node} is a {kind:?} node")]
    Unserializable { node: NodeId, kind: NodeKind },
}

/// Serializes a detached subtree rooted at `node`.
pub fn serialize_node(tree: &DomTree, node: NodeId) -> Result<SerializedNode, EncodeError> {
    match tree.data(node) {
        NodeData::Text(data) => Ok(SerializedNode::Text(data.clone())),
        NodeData::Comment(data) => Ok(SerializedNode::Comment(data.clone())),
        NodeData::Element { tag, attrs } => {
            let attrs: IndexMap<String, String> = attrs.iter().cloned().collect();
            let children = tree
                .children(node)
                .iter()
                .map(|&child| serialize_node(tree, child))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SerializedNode::Element {
                tag: tag.clone(),
                attrs,
                children,
            })
        }
        other => Err(EncodeError::Unserializable {
            node,
            kind: other.kind(),
        }),
    }
}

/// Encodes member calls observed under one root.
#[derive(Debug, Clone, Copy)]
pub struct PatchEncoder {
    root: NodeId,
    sibling_fallback: bool,
}

impl PatchEncoder {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            sibling_fallback: false,
        }
    }

    /// Substitute index 0 for nodes missing from their sibling set instead of
    /// failing. The resulting patch may address a different node.
    pub fn with_sibling_fallback(mut self, enabled: bool) -> Self {
        self.sibling_fallback = enabled;
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn path(&self, tree: &DomTree, node: NodeId) -> Result<NodePath, PathError> {
        if self.sibling_fallback {
            get_path_with_fallback(tree, node, self.root).ok_or(PathError::NotDescendant {
                node,
                root: self.root,
            })
        } else {
            try_get_path(tree, node, self.root)
        }
    }

    /// Encodes `target.member(args)` against the pre-call state of `tree`.
    pub fn encode(
        &self,
        tree: &DomTree,
        target: NodeId,
        member: Member,
        args: &[Arg],
    ) -> Result<Patch, EncodeError> {
        if !tree.contains(self.root, target) {
            return Err(EncodeError::Unreachable {
                node: target,
                member,
            });
        }
        let target_path = self.path(tree, target)?;
        let args = args
            .iter()
            .map(|arg| self.encode_arg(tree, arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Patch {
            target_path,
            member: member.name().to_owned(),
            args,
        })
    }

    /// Nodes inside the root travel as references, all others inline.
    pub fn encode_arg(&self, tree: &DomTree, arg: &Arg) -> Result<SerializedArg, EncodeError> {
        match arg {
            Arg::Null => Ok(SerializedArg::Primitive(None)),
            Arg::Str(value) => Ok(SerializedArg::Primitive(Some(value.clone()))),
            Arg::Node(node) if tree.contains(self.root, *node) => {
                Ok(SerializedArg::NodeReference(self.path(tree, *node)?))
            }
            Arg::Node(node) => Ok(SerializedArg::InlineNode(serialize_node(tree, *node)?)),
        }
    }
}
