//! Patch protocol types.

use dom_mirror_path::NodePath;
use indexmap::IndexMap;

/// One captured member call.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub target_path: NodePath,
    pub member: String,
    pub args: Vec<SerializedArg>,
}

/// A member argument in transmissible form.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedArg {
    /// String form of a primitive; `None` is null.
    Primitive(Option<String>),
    /// A node already present in the replicated tree.
    NodeReference(NodePath),
    /// A node that is not yet part of the tree, serialized whole.
    InlineNode(SerializedNode),
}

/// A detached subtree.
///
/// Attribute maps compare equal regardless of key order.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedNode {
    Text(String),
    Comment(String),
    Element {
        tag: String,
        attrs: IndexMap<String, String>,
        children: Vec<SerializedNode>,
    },
}

impl SerializedNode {
    pub fn text(data: impl Into<String>) -> Self {
        SerializedNode::Text(data.into())
    }

    pub fn element(tag: impl Into<String>) -> Self {
        SerializedNode::Element {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter; no-op on non-elements.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let SerializedNode::Element { attrs, .. } = &mut self {
            attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Builder-style child append; no-op on non-elements.
    pub fn with_child(mut self, child: SerializedNode) -> Self {
        if let SerializedNode::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }
}

/// A unit carried by the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Patch(Patch),
    Snapshot { new_html: String },
}

impl From<Patch> for Message {
    fn from(patch: Patch) -> Self {
        Message::Patch(patch)
    }
}
