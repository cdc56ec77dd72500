//! Mutation surface discovery.
//!
//! Computes the spy set: for every declared interface that derives from
//! `Node`, the own members that can change tree state. A member is mutating
//! when it is a setter, or a method missing from [`READ_ONLY_DENYLIST`].
//!
//! A name missing from the denylist only over-reports (and fails the shape
//! check if the tree cannot dispatch it). A name wrongly *in* the denylist
//! silently drops a mutation, which is why the result is pinned by the
//! conformance test in `tests/discovery_conformance.rs`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use dom_mirror_tree::member::Member;
use dom_mirror_tree::node::NodeKind;
use dom_mirror_tree::surface::{self, InterfaceDef, MemberKind, NODE_INTERFACE};
use thiserror::Error;

/// Methods that never change tree state.
pub const READ_ONLY_DENYLIST: &[&str] = &[
    // attribute and id lookup
    "getAttribute",
    "getAttributeNames",
    "hasAttribute",
    "hasAttributes",
    "getElementById",
    // selectors and collections
    "getElementsByTagName",
    "getElementsByClassName",
    "querySelector",
    "querySelectorAll",
    "closest",
    "matches",
    // geometry
    "getBoundingClientRect",
    "getClientRects",
    // tree position and comparison
    "contains",
    "compareDocumentPosition",
    "isEqualNode",
    "isSameNode",
    "hasChildNodes",
    "getRootNode",
    "lookupPrefix",
    "lookupNamespaceURI",
    "isDefaultNamespace",
    // reads of character data
    "substringData",
    // cloning and factories produce detached nodes only
    "cloneNode",
    "createElement",
    "createTextNode",
    "createComment",
    // events and focus
    "addEventListener",
    "removeEventListener",
    "dispatchEvent",
    "click",
    "focus",
    "blur",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("tree surface {version} does not match: {reason}")]
    ShapeMismatch {
        version: &'static str,
        reason: String,
    },
}

/// Mutating members per node interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpySet {
    version: &'static str,
    parents: BTreeMap<&'static str, Option<&'static str>>,
    members: BTreeMap<&'static str, BTreeMap<&'static str, MemberKind>>,
}

impl SpySet {
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Own mutating members of `interface`; `None` for non-node interfaces.
    pub fn members_of(&self, interface: &str) -> Option<&BTreeMap<&'static str, MemberKind>> {
        self.members.get(interface)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.keys().copied()
    }

    /// Total number of (interface, member) entries.
    pub fn len(&self) -> usize {
        self.members.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether calling `member` on a node of `kind` must be captured.
    pub fn is_mutating(&self, kind: NodeKind, member: Member) -> bool {
        let mut current = Some(kind.interface());
        while let Some(name) = current {
            if self
                .members
                .get(name)
                .is_some_and(|own| own.contains_key(member.name()))
            {
                return true;
            }
            current = self.parents.get(name).copied().flatten();
        }
        false
    }
}

fn mismatch(version: &'static str, reason: String) -> DiscoveryError {
    DiscoveryError::ShapeMismatch { version, reason }
}

fn derives_from_node(interfaces: &[InterfaceDef], def: &InterfaceDef) -> bool {
    let mut current = Some(def);
    // Bounded so a parent cycle cannot loop forever.
    for _ in 0..=interfaces.len() {
        let Some(def) = current else {
            return false;
        };
        if def.name == NODE_INTERFACE {
            return true;
        }
        current = def
            .parent
            .and_then(|parent| interfaces.iter().find(|d| d.name == parent));
    }
    false
}

/// Builds and shape-checks the spy set for `interfaces`.
pub fn discover(
    version: &'static str,
    interfaces: &[InterfaceDef],
) -> Result<SpySet, DiscoveryError> {
    if !interfaces.iter().any(|def| def.name == NODE_INTERFACE) {
        return Err(mismatch(version, format!("no `{NODE_INTERFACE}` interface")));
    }
    for def in interfaces {
        if let Some(parent) = def.parent {
            if !interfaces.iter().any(|d| d.name == parent) {
                return Err(mismatch(
                    version,
                    format!("`{}` extends undeclared `{parent}`", def.name),
                ));
            }
        }
    }

    let mut spy = SpySet {
        version,
        parents: BTreeMap::new(),
        members: BTreeMap::new(),
    };
    for def in interfaces.iter().filter(|def| derives_from_node(interfaces, def)) {
        let own: BTreeMap<_, _> = def
            .members
            .iter()
            .filter(|m| match m.kind {
                MemberKind::Setter => true,
                MemberKind::Method => !READ_ONLY_DENYLIST.contains(&m.name),
                MemberKind::Getter => false,
            })
            .map(|m| (m.name, m.kind))
            .collect();
        for name in own.keys() {
            if Member::from_name(name).is_none() {
                return Err(mismatch(
                    version,
                    format!("`{}.{name}` is mutating but not dispatchable", def.name),
                ));
            }
        }
        spy.parents.insert(def.name, def.parent);
        spy.members.insert(def.name, own);
    }

    for member in Member::ALL {
        let declared = spy.members.values().any(|own| own.contains_key(member.name()));
        if !declared {
            return Err(mismatch(
                version,
                format!("dispatchable member `{member}` is not declared as mutating"),
            ));
        }
    }

    tracing::debug!(
        version,
        interfaces = spy.members.len(),
        members = spy.len(),
        "mutation surface discovered"
    );
    Ok(spy)
}

/// Spy set of the linked tree implementation, computed once per process.
pub fn spy_set() -> Result<&'static SpySet, DiscoveryError> {
    static SPY_SET: OnceLock<Result<SpySet, DiscoveryError>> = OnceLock::new();
    SPY_SET
        .get_or_init(|| discover(surface::SURFACE_VERSION, surface::INTERFACES))
        .as_ref()
        .map_err(Clone::clone)
}
