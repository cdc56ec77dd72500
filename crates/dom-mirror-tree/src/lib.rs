//! Arena document tree with a single, observable mutation API.
//!
//! This is the document-tree implementation both halves of a mirror session
//! run on: the primary tree that test code mutates, and the replica rebuilt
//! from captured patches.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`node`] | [`NodeId`], [`NodeKind`], [`NodeData`] |
//! [`tree`] | [`DomTree`] construction and reads |
//! [`member`] | [`Member`], the mutating members by DOM name |
//! [`mutation`] | member dispatch, [`Arg`], [`Outcome`], [`MutationObserver`] |
//! [`surface`] | declared interfaces and members, [`surface::SURFACE_VERSION`] |
//! [`parse`] | html5ever-backed document and fragment parsing |
//! [`serialize`] | HTML serialization |
//!
//! # Example
//!
//! ```
//! use dom_mirror_tree::DomTree;
//!
//! let mut tree = DomTree::parse_document("<div id=a><span>x</span></div>");
//! let div = tree.get_element_by_id("a").unwrap();
//! let button = tree.create_element("button");
//! tree.set_text_content(button, Some("y")).unwrap();
//! tree.append_child(div, button).unwrap();
//! assert_eq!(
//!     tree.outer_html(div),
//!     r#"<div id="a"><span>x</span><button>y</button></div>"#
//! );
//! ```

pub mod error;
pub mod member;
pub mod mutation;
pub mod node;
pub mod parse;
pub mod serialize;
pub mod surface;
pub mod tree;

pub use error::DomError;
pub use member::Member;
pub use mutation::{Arg, MutationObserver, Outcome};
pub use node::{NodeData, NodeId, NodeKind};
pub use surface::{MemberKind, SURFACE_VERSION};
pub use tree::DomTree;
