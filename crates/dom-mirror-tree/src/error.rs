//! Errors raised by tree members.
//!
//! Member calls are validated before anything is reported or changed, so a
//! returned error always means the tree is untouched.

use thiserror::Error;

use crate::member::Member;
use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("HIERARCHY_REQUEST: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("NOT_FOUND: {node:?} is not a child of {parent:?}")]
    NotFound { parent: NodeId, node: NodeId },
    #[error("INDEX_SIZE: offset {offset} exceeds length {length}")]
    IndexSize { offset: usize, length: usize },
    #[error("INVALID_CHARACTER: {0:?}")]
    InvalidCharacter(String),
    #[error("NOT_SUPPORTED: {member} on {kind:?}")]
    NotSupported { member: Member, kind: NodeKind },
    #[error("MISSING_ARGUMENT: {member} expects argument #{index}")]
    MissingArgument { member: Member, index: usize },
    #[error("INVALID_ARGUMENT: {member} argument #{index}: {reason}")]
    InvalidArgument {
        member: Member,
        index: usize,
        reason: &'static str,
    },
}
