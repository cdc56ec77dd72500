//! HTML serializer.
//!
//! Output follows the HTML fragment serialization algorithm closely enough
//! that re-parsing it with html5ever yields the same tree for documents that
//! came out of the parser in the first place.

use crate::node::{NodeData, NodeId};
use crate::tree::DomTree;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// html5ever parses with scripting enabled, so `noscript` holds raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// The parser drops one newline right after these start tags.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

impl DomTree {
    /// Serializes the whole document, doctype included.
    pub fn to_html(&self) -> String {
        self.inner_html(self.document())
    }

    /// Serialization of `node` itself.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, false, &mut out);
        out
    }

    /// Serialization of the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let raw = self
            .tag_name(node)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    fn starts_with_newline(&self, node: NodeId) -> bool {
        match self.children(node).first() {
            Some(&first) => matches!(self.data(first), NodeData::Text(data) if data.starts_with('\n')),
            None => false,
        }
    }

    fn write_node(&self, node: NodeId, raw_text: bool, out: &mut String) {
        match self.data(node) {
            NodeData::Document => out.push_str(&self.inner_html(node)),
            NodeData::Doctype { name } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Text(data) if raw_text => out.push_str(data),
            NodeData::Text(data) => escape_text(data, out),
            NodeData::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                if LEADING_NEWLINE_ELEMENTS.contains(&tag.as_str())
                    && self.starts_with_newline(node)
                {
                    out.push('\n');
                }
                out.push_str(&self.inner_html(node));
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}
