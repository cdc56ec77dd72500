//! Node storage.
//!
//! Nodes live in a `Vec` arena owned by [`DomTree`](crate::DomTree); links
//! between them are [`NodeId`] indices instead of pointers. A node removed from
//! its parent stays allocated (detached) until the tree itself is dropped.

use std::fmt;

/// Index of a node inside the arena of the tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Doctype,
    Element,
    Text,
    Comment,
}

impl NodeKind {
    /// Most-derived interface in the declared surface for this kind.
    pub fn interface(self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Doctype => "DocumentType",
            NodeKind::Element => "HTMLElement",
            NodeKind::Text => "Text",
            NodeKind::Comment => "Comment",
        }
    }

    pub fn is_character_data(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Comment)
    }

    /// Whether nodes of this kind may hold children.
    pub fn is_parent(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element)
    }
}

/// Payload of a node.
///
/// Attributes keep insertion order, which is also their serialization order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Doctype { name: String },
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Doctype { .. } => NodeKind::Doctype,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Node {
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}
