//! Arena document tree: construction, reads, and the raw link operations the
//! mutation layer is built on.

use std::fmt;

use crate::mutation::MutationObserver;
use crate::node::{Node, NodeData, NodeId, NodeKind};

/// A rooted, ordered document tree.
///
/// The root is always a `Document` node. Every change to tree state goes
/// through the member API in [`crate::mutation`]; the raw link helpers here are
/// crate-private so nothing can bypass the installed observer.
pub struct DomTree {
    nodes: Vec<Node>,
    document: NodeId,
    pub(crate) observer: Option<Box<dyn MutationObserver>>,
    pub(crate) depth: u32,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomTree")
            .field("nodes", &self.nodes.len())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl DomTree {
    /// An empty tree holding only its document node.
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node::new(NodeData::Document)],
            document: NodeId::from_index(0),
            observer: None,
            depth: 0,
        }
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Number of allocated nodes, detached ones included.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    // ── Factories ──────────────────────────────────────────────────────────

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_element_with_attrs(tag, Vec::new())
    }

    /// Creates a detached element with the given attributes already in place.
    pub fn create_element_with_attrs(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs,
        })
    }

    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.alloc(NodeData::Text(data.to_owned()))
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeData::Comment(data.to_owned()))
    }

    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.alloc(NodeData::Doctype {
            name: name.to_owned(),
        })
    }

    // ── Reads ──────────────────────────────────────────────────────────────

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).data.kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.kind(child) == NodeKind::Element)
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .map(|prev| self.children(parent)[prev])
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Attributes in insertion order; empty for non-elements.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match self.data(id) {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text of a `Text` or `Comment` node.
    pub fn character_data(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    /// DOM `textContent`: `None` for documents and doctypes.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match self.data(id) {
            NodeData::Document | NodeData::Doctype { .. } => None,
            NodeData::Text(data) | NodeData::Comment(data) => Some(data.clone()),
            NodeData::Element { .. } => {
                let mut out = String::new();
                for node in self.descendants(id) {
                    if let NodeData::Text(data) = self.data(node) {
                        out.push_str(data);
                    }
                }
                Some(out)
            }
        }
    }

    /// Inclusive ancestor test: `true` when `node == ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.document, node)
    }

    /// `node` followed by its parent chain.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent(n))
    }

    /// Descendants of `id` in tree order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.document).next()
    }

    fn html_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html)
            .find(|&child| self.tag_name(child) == Some(tag))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.html_child("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.html_child("body")
    }

    /// First connected element whose `id` attribute equals `value`.
    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.document)
            .into_iter()
            .find(|&node| self.get_attribute(node, "id") == Some(value))
    }

    // ── Raw link operations (never observed) ───────────────────────────────

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    pub(crate) fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != id);
        }
    }

    /// Moves `node` under `parent`, before `before` or at the end.
    pub(crate) fn insert_raw(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        self.detach(node);
        let siblings = &mut self.nodes[parent.index()].children;
        let index = before
            .and_then(|b| siblings.iter().position(|&c| c == b))
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
        self.nodes[node.index()].parent = Some(parent);
    }

    /// Drops every node except the document, invalidating all other ids.
    pub(crate) fn truncate_to_document(&mut self) {
        self.nodes.truncate(1);
        self.nodes[self.document.index()].children.clear();
    }

    pub(crate) fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doc = tree.document();
        let html = tree.create_element("HTML");
        let body = tree.create_element("body");
        let text = tree.create_text_node("hi");
        tree.insert_raw(doc, html, None);
        tree.insert_raw(html, body, None);
        tree.insert_raw(body, text, None);
        (tree, html, body, text)
    }

    #[test]
    fn tags_are_lowercased() {
        let (tree, html, _, _) = sample();
        assert_eq!(tree.tag_name(html), Some("html"));
    }

    #[test]
    fn contains_is_inclusive() {
        let (tree, html, body, text) = sample();
        assert!(tree.contains(html, text));
        assert!(tree.contains(body, body));
        assert!(!tree.contains(text, body));
    }

    #[test]
    fn insert_raw_moves_within_parent() {
        let (mut tree, _, body, text) = sample();
        let a = tree.create_text_node("a");
        tree.insert_raw(body, a, None);
        tree.insert_raw(body, a, Some(text));
        assert_eq!(tree.children(body), &[a, text]);
        assert_eq!(tree.previous_sibling(text), Some(a));
        assert_eq!(tree.next_sibling(text), None);
    }

    #[test]
    fn text_content_concatenates_descendant_text() {
        let (mut tree, _, body, _) = sample();
        let span = tree.create_element("span");
        let inner = tree.create_text_node(" there");
        let comment = tree.create_comment("skip");
        tree.insert_raw(body, span, None);
        tree.insert_raw(span, inner, None);
        tree.insert_raw(body, comment, None);
        assert_eq!(tree.text_content(body).as_deref(), Some("hi there"));
        assert_eq!(tree.text_content(tree.document()), None);
    }

    #[test]
    fn body_lookup() {
        let (tree, _, body, _) = sample();
        assert_eq!(tree.body(), Some(body));
        assert_eq!(tree.head(), None);
    }
}
