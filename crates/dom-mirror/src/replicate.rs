//! Replay of captured messages onto a replica tree.

use dom_mirror_path::{format_node_path, get_node_by_path, NodePath};
use dom_mirror_tree::{Arg, DomError, DomTree, Member, NodeId};
use thiserror::Error;

use crate::patch::{Message, Patch, SerializedArg, SerializedNode};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplicaError {
    #[error("UNRESOLVED_PATH: no node at {}", format_node_path(.path))]
    UnresolvedPath { path: NodePath },
    #[error("UNRESOLVED_REFERENCE: argument refers to missing node {}", format_node_path(.path))]
    UnresolvedReference { path: NodePath },
    #[error("UNKNOWN_MEMBER: {0:?}")]
    UnknownMember(String),
    #[error("{member} failed on the replica: {source}")]
    Dom { member: Member, source: DomError },
    #[error("DESYNCHRONIZED: replica diverged, waiting for a snapshot")]
    Desynchronized,
}

/// Creates the detached subtree described by `node` in `tree`.
pub fn instantiate(tree: &mut DomTree, node: &SerializedNode) -> Result<NodeId, DomError> {
    match node {
        SerializedNode::Text(data) => Ok(tree.create_text_node(data)),
        SerializedNode::Comment(data) => Ok(tree.create_comment(data)),
        SerializedNode::Element {
            tag,
            attrs,
            children,
        } => {
            let attrs = attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let element = tree.create_element_with_attrs(tag, attrs);
            for child in children {
                let child = instantiate(tree, child)?;
                tree.append_child(element, child)?;
            }
            Ok(element)
        }
    }
}

/// Owns the replica tree of one session.
///
/// Patches are applied in arrival order. After the first failure the replica
/// no longer matches the primary, so every later patch is refused until a
/// snapshot resets it.
#[derive(Debug)]
pub struct Replicator {
    tree: DomTree,
    desynchronized: bool,
    applied: usize,
}

impl Default for Replicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Replicator {
    /// A replica holding the empty document shell.
    pub fn new() -> Self {
        Self {
            tree: DomTree::parse_document(""),
            desynchronized: false,
            applied: 0,
        }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Markup of the whole replica document.
    pub fn html(&self) -> String {
        self.tree.to_html()
    }

    pub fn is_desynchronized(&self) -> bool {
        self.desynchronized
    }

    /// Messages applied successfully so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn apply(&mut self, message: &Message) -> Result<(), ReplicaError> {
        match message {
            Message::Patch(patch) => self.apply_patch(patch),
            Message::Snapshot { new_html } => {
                self.apply_snapshot(new_html);
                Ok(())
            }
        }
    }

    pub fn apply_patch(&mut self, patch: &Patch) -> Result<(), ReplicaError> {
        if self.desynchronized {
            return Err(ReplicaError::Desynchronized);
        }
        match self.replay(patch) {
            Ok(()) => {
                self.applied += 1;
                Ok(())
            }
            Err(error) => {
                tracing::error!(%error, member = %patch.member, "replica desynchronized");
                self.desynchronized = true;
                Err(error)
            }
        }
    }

    /// Replaces the whole replica document and clears desynchronization.
    pub fn apply_snapshot(&mut self, html: &str) {
        self.tree.reset_from_html(html);
        if self.desynchronized {
            tracing::info!("replica resynchronized from snapshot");
        }
        self.desynchronized = false;
        self.applied += 1;
    }

    /// Discards the replica, returning its final markup.
    pub fn teardown(self) -> String {
        tracing::debug!(applied = self.applied, "replica torn down");
        self.tree.to_html()
    }

    fn resolve(&self, path: &[usize]) -> Option<NodeId> {
        get_node_by_path(&self.tree, self.tree.document(), path)
    }

    fn replay(&mut self, patch: &Patch) -> Result<(), ReplicaError> {
        let target = self
            .resolve(&patch.target_path)
            .ok_or_else(|| ReplicaError::UnresolvedPath {
                path: patch.target_path.clone(),
            })?;
        let member = Member::from_name(&patch.member)
            .ok_or_else(|| ReplicaError::UnknownMember(patch.member.clone()))?;
        // References are resolved against the pre-call replica before any
        // inline node is created.
        let mut args = Vec::with_capacity(patch.args.len());
        for arg in &patch.args {
            args.push(match arg {
                SerializedArg::Primitive(value) => Arg::from(value.as_deref()),
                SerializedArg::NodeReference(path) => Arg::Node(self.resolve(path).ok_or_else(
                    || ReplicaError::UnresolvedReference { path: path.clone() },
                )?),
                SerializedArg::InlineNode(_) => Arg::Null,
            });
        }
        for (slot, arg) in args.iter_mut().zip(&patch.args) {
            if let SerializedArg::InlineNode(node) = arg {
                let node = instantiate(&mut self.tree, node)
                    .map_err(|source| ReplicaError::Dom { member, source })?;
                *slot = Arg::Node(node);
            }
        }
        tracing::trace!(%member, path = %format_node_path(&patch.target_path), "replaying");
        self.tree
            .invoke(target, member, args)
            .map(|_| ())
            .map_err(|source| ReplicaError::Dom { member, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = "<html><head></head><body></body></html>";

    fn patch(path: &[usize], member: &str, args: Vec<SerializedArg>) -> Message {
        Message::Patch(Patch {
            target_path: path.to_vec(),
            member: member.into(),
            args,
        })
    }

    fn text(value: &str) -> SerializedArg {
        SerializedArg::Primitive(Some(value.into()))
    }

    #[test]
    fn starts_as_empty_shell() {
        assert_eq!(Replicator::new().html(), SHELL);
    }

    #[test]
    fn inline_subtree_is_instantiated() {
        let mut replica = Replicator::new();
        let node = SerializedNode::element("ul")
            .with_attr("class", "list")
            .with_child(SerializedNode::element("li").with_child(SerializedNode::text("one")))
            .with_child(SerializedNode::Comment("end".into()));
        replica
            .apply(&patch(&[0, 1], "appendChild", vec![SerializedArg::InlineNode(node)]))
            .unwrap();
        assert_eq!(
            replica.html(),
            r#"<html><head></head><body><ul class="list"><li>one</li><!--end--></ul></body></html>"#
        );
    }

    #[test]
    fn references_move_existing_nodes() {
        let mut replica = Replicator::new();
        replica.apply_snapshot("<p>a</p><p>b</p>");
        replica
            .apply(&patch(
                &[0, 1],
                "insertBefore",
                vec![
                    SerializedArg::NodeReference(vec![0, 1, 1]),
                    SerializedArg::NodeReference(vec![0, 1, 0]),
                ],
            ))
            .unwrap();
        assert_eq!(
            replica.html(),
            "<html><head></head><body><p>b</p><p>a</p></body></html>"
        );
    }

    #[test]
    fn null_argument_reaches_the_member() {
        let mut replica = Replicator::new();
        replica.apply_snapshot("<p>a</p>");
        replica
            .apply(&patch(
                &[0, 1, 0],
                "textContent",
                vec![SerializedArg::Primitive(None)],
            ))
            .unwrap();
        assert_eq!(replica.html(), "<html><head></head><body><p></p></body></html>");
    }

    #[test]
    fn failure_poisons_until_snapshot() {
        let mut replica = Replicator::new();
        let err = replica
            .apply(&patch(&[0, 1, 7], "remove", vec![]))
            .unwrap_err();
        assert_eq!(err, ReplicaError::UnresolvedPath { path: vec![0, 1, 7] });
        assert!(replica.is_desynchronized());
        assert_eq!(
            replica.apply(&patch(&[0, 1], "normalize", vec![])),
            Err(ReplicaError::Desynchronized)
        );

        replica.apply_snapshot("<p>x</p>");
        assert!(!replica.is_desynchronized());
        replica
            .apply(&patch(&[0, 1, 0], "id", vec![text("p1")]))
            .unwrap();
        assert_eq!(
            replica.teardown(),
            r#"<html><head></head><body><p id="p1">x</p></body></html>"#
        );
    }

    #[test]
    fn unknown_member_and_dom_errors_are_reported() {
        let mut replica = Replicator::new();
        assert_eq!(
            replica.apply(&patch(&[0], "click", vec![])),
            Err(ReplicaError::UnknownMember("click".into()))
        );

        let mut replica = Replicator::new();
        replica.apply_snapshot("<p>abc</p>");
        let err = replica
            .apply(&patch(&[0, 1, 0, 0], "deleteData", vec![text("9"), text("1")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ReplicaError::Dom {
                member: Member::DeleteData,
                source: DomError::IndexSize { .. }
            }
        ));
    }

    #[test]
    fn snapshots_do_not_grow_the_replica() {
        let mut replica = Replicator::new();
        let markup = "<div><p>a</p><p>b</p></div>";
        replica.apply_snapshot(markup);
        let size = replica.tree().allocated();
        for _ in 0..100 {
            replica.apply_snapshot(markup);
        }
        assert_eq!(replica.tree().allocated(), size);
        replica
            .apply(&patch(&[0, 1, 0, 1], "remove", vec![]))
            .unwrap();
        assert_eq!(
            replica.html(),
            "<html><head></head><body><div><p>a</p></div></body></html>"
        );
    }

    #[test]
    fn dangling_reference_is_reported() {
        let mut replica = Replicator::new();
        assert_eq!(
            replica.apply(&patch(
                &[0, 1],
                "appendChild",
                vec![SerializedArg::NodeReference(vec![0, 1, 3])]
            )),
            Err(ReplicaError::UnresolvedReference { path: vec![0, 1, 3] })
        );
    }
}
