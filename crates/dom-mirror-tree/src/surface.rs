//! Declared member surface of the tree implementation.
//!
//! Each interface lists its own members only; inherited members are found by
//! walking `parent`. Mixin members (ParentNode, ChildNode) are listed directly
//! on the interfaces that include them. Non-node interfaces are declared too so
//! that consumers can tell them apart from node-derived ones.
//!
//! Bump [`SURFACE_VERSION`] whenever a member is added, removed or changes kind.

use crate::node::NodeKind;

pub const SURFACE_VERSION: &str = "dom-mirror-tree/1";

/// Name of the base interface every node interface derives from.
pub const NODE_INTERFACE: &str = "Node";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    /// Read-only accessor.
    Getter,
    /// Accessor with a setter.
    Setter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberDef {
    pub name: &'static str,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceDef {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    pub members: &'static [MemberDef],
}

const fn method(name: &'static str) -> MemberDef {
    MemberDef {
        name,
        kind: MemberKind::Method,
    }
}

const fn getter(name: &'static str) -> MemberDef {
    MemberDef {
        name,
        kind: MemberKind::Getter,
    }
}

const fn setter(name: &'static str) -> MemberDef {
    MemberDef {
        name,
        kind: MemberKind::Setter,
    }
}

pub static INTERFACES: &[InterfaceDef] = &[
    InterfaceDef {
        name: "EventTarget",
        parent: None,
        members: &[
            method("addEventListener"),
            method("removeEventListener"),
            method("dispatchEvent"),
        ],
    },
    InterfaceDef {
        name: "Node",
        parent: Some("EventTarget"),
        members: &[
            getter("nodeType"),
            getter("nodeName"),
            getter("ownerDocument"),
            getter("parentNode"),
            getter("parentElement"),
            getter("childNodes"),
            getter("firstChild"),
            getter("lastChild"),
            getter("previousSibling"),
            getter("nextSibling"),
            getter("isConnected"),
            setter("textContent"),
            setter("nodeValue"),
            method("appendChild"),
            method("insertBefore"),
            method("removeChild"),
            method("replaceChild"),
            method("normalize"),
            method("cloneNode"),
            method("contains"),
            method("compareDocumentPosition"),
            method("isEqualNode"),
            method("isSameNode"),
            method("hasChildNodes"),
            method("getRootNode"),
            method("lookupPrefix"),
            method("lookupNamespaceURI"),
            method("isDefaultNamespace"),
        ],
    },
    InterfaceDef {
        name: "Document",
        parent: Some("Node"),
        members: &[
            getter("documentElement"),
            getter("doctype"),
            getter("head"),
            getter("body"),
            method("append"),
            method("prepend"),
            method("replaceChildren"),
            method("createElement"),
            method("createTextNode"),
            method("createComment"),
            method("getElementById"),
            method("getElementsByTagName"),
            method("getElementsByClassName"),
            method("querySelector"),
            method("querySelectorAll"),
        ],
    },
    InterfaceDef {
        name: "DocumentType",
        parent: Some("Node"),
        members: &[
            getter("name"),
            getter("publicId"),
            getter("systemId"),
            method("before"),
            method("after"),
            method("replaceWith"),
            method("remove"),
        ],
    },
    InterfaceDef {
        name: "Element",
        parent: Some("Node"),
        members: &[
            getter("tagName"),
            getter("localName"),
            getter("attributes"),
            getter("children"),
            getter("childElementCount"),
            getter("firstElementChild"),
            getter("lastElementChild"),
            getter("previousElementSibling"),
            getter("nextElementSibling"),
            getter("outerHTML"),
            setter("id"),
            setter("className"),
            setter("innerHTML"),
            method("getAttribute"),
            method("getAttributeNames"),
            method("hasAttribute"),
            method("hasAttributes"),
            method("setAttribute"),
            method("removeAttribute"),
            method("toggleAttribute"),
            method("append"),
            method("prepend"),
            method("replaceChildren"),
            method("before"),
            method("after"),
            method("replaceWith"),
            method("remove"),
            method("closest"),
            method("matches"),
            method("querySelector"),
            method("querySelectorAll"),
            method("getElementsByTagName"),
            method("getElementsByClassName"),
            method("getBoundingClientRect"),
            method("getClientRects"),
        ],
    },
    InterfaceDef {
        name: "HTMLElement",
        parent: Some("Element"),
        members: &[
            getter("offsetParent"),
            getter("offsetTop"),
            getter("offsetLeft"),
            getter("offsetWidth"),
            getter("offsetHeight"),
            method("click"),
            method("focus"),
            method("blur"),
        ],
    },
    InterfaceDef {
        name: "CharacterData",
        parent: Some("Node"),
        members: &[
            getter("length"),
            getter("previousElementSibling"),
            getter("nextElementSibling"),
            setter("data"),
            method("substringData"),
            method("appendData"),
            method("insertData"),
            method("deleteData"),
            method("replaceData"),
            method("before"),
            method("after"),
            method("replaceWith"),
            method("remove"),
        ],
    },
    InterfaceDef {
        name: "Text",
        parent: Some("CharacterData"),
        members: &[getter("wholeText"), method("splitText")],
    },
    InterfaceDef {
        name: "Comment",
        parent: Some("CharacterData"),
        members: &[],
    },
    InterfaceDef {
        name: "DOMTokenList",
        parent: None,
        members: &[
            getter("length"),
            method("add"),
            method("remove"),
            method("toggle"),
            method("replace"),
            method("contains"),
        ],
    },
    InterfaceDef {
        name: "Range",
        parent: None,
        members: &[
            method("insertNode"),
            method("deleteContents"),
            method("selectNode"),
            method("cloneRange"),
        ],
    },
];

pub fn interface(name: &str) -> Option<&'static InterfaceDef> {
    INTERFACES.iter().find(|def| def.name == name)
}

/// Iterates `name` and its ancestors, most-derived first.
///
/// Stops at the first parent name that is not declared.
pub fn interface_chain(name: &str) -> impl Iterator<Item = &'static InterfaceDef> {
    let mut next = interface(name);
    std::iter::from_fn(move || {
        let current = next?;
        next = current.parent.and_then(interface);
        Some(current)
    })
}

/// Whether a node of `kind` exposes a member called `member_name`.
pub fn declares(kind: NodeKind, member_name: &str) -> bool {
    interface_chain(kind.interface())
        .any(|def| def.members.iter().any(|m| m.name == member_name))
}
