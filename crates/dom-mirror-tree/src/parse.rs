//! HTML parsing through html5ever.
//!
//! html5ever builds an `RcDom`, which is then copied into the arena. Parsing
//! never fails: malformed input is recovered the way browsers recover it.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::node::NodeId;
use crate::tree::DomTree;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

impl DomTree {
    /// Parses a full HTML document into a new tree.
    pub fn parse_document(markup: &str) -> DomTree {
        let mut tree = DomTree::new();
        tree.reset_from_html(markup);
        tree
    }

    /// Replaces the whole document contents with the parse of `markup`.
    ///
    /// The arena is rebuilt, so every `NodeId` other than the document's is
    /// invalidated. This bypasses the member API and is never observed.
    pub fn reset_from_html(&mut self, markup: &str) {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
        let document = self.document();
        self.truncate_to_document();
        let children: Vec<Handle> = dom.document.children.borrow().clone();
        for child in &children {
            if let Some(node) = import(self, child) {
                self.insert_raw(document, node, None);
            }
        }
    }

    /// Parses `markup` as the contents of a `context` element.
    ///
    /// The returned nodes are detached, in document order.
    pub fn parse_fragment(&mut self, context: &str, markup: &str) -> Vec<NodeId> {
        parse_fragment_into(self, context, markup)
    }
}

pub(crate) fn parse_fragment_into(tree: &mut DomTree, context: &str, markup: &str) -> Vec<NodeId> {
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(context),
    );
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(markup);
    // The fragment parser wraps the result in a synthetic <html> element.
    let roots: Vec<Handle> = dom.document.children.borrow().clone();
    let mut out = Vec::new();
    for root in &roots {
        let children: Vec<Handle> = root.children.borrow().clone();
        for child in &children {
            if let Some(node) = import(tree, child) {
                out.push(node);
            }
        }
    }
    out
}

fn import(tree: &mut DomTree, handle: &Handle) -> Option<NodeId> {
    let node = match &handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
        RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
        RcNodeData::Text { contents } => tree.create_text_node(&contents.borrow()),
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            tree.create_element_with_attrs(&name.local, attrs)
        }
    };
    let children: Vec<Handle> = handle.children.borrow().clone();
    for child in &children {
        if let Some(child) = import(tree, child) {
            tree.insert_raw(node, child, None);
        }
    }
    Some(node)
}
