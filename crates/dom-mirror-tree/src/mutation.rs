//! The owning mutation API of [`DomTree`].
//!
//! Every member call runs in four steps:
//!
//! 1. plan: arguments are parsed and the call is validated without touching the
//!    tree, so failing calls are neither reported nor applied;
//! 2. [`MutationObserver::on_mutation`] sees the call with the tree still in
//!    its pre-call state;
//! 3. the planned call is performed;
//! 4. [`MutationObserver::after_mutation`] sees the resulting state.
//!
//! Members that are implemented in terms of other members (`id` through
//! `setAttribute`, for instance) only report the outermost call.

use crate::error::DomError;
use crate::member::Member;
use crate::node::{NodeData, NodeId, NodeKind};
use crate::parse;
use crate::surface;
use crate::tree::DomTree;

/// A live argument of a member call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Null,
    Str(String),
    Node(NodeId),
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<Option<&str>> for Arg {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Arg::Null, Arg::from)
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<NodeId> for Arg {
    fn from(value: NodeId) -> Self {
        Arg::Node(value)
    }
}

/// Return value of a member call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unit,
    Node(NodeId),
    Bool(bool),
}

/// Synchronous listener for member calls on one tree.
///
/// Observers only get shared access to the tree and cannot mutate it from
/// inside a notification.
pub trait MutationObserver {
    fn on_mutation(&mut self, tree: &DomTree, target: NodeId, member: Member, args: &[Arg]);

    fn after_mutation(&mut self, tree: &DomTree, target: NodeId, member: Member) {
        let _ = (tree, target, member);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Node(NodeId),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    First,
    Last,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Insert {
        node: NodeId,
        before: Option<NodeId>,
    },
    RemoveChild(NodeId),
    ReplaceChild {
        node: NodeId,
        child: NodeId,
    },
    Normalize,
    SetTextContent(String),
    SetNodeValue(String),
    SetAttribute {
        name: String,
        value: String,
    },
    RemoveAttribute(String),
    ToggleAttribute {
        name: String,
        force: Option<bool>,
    },
    SetReflected {
        attribute: &'static str,
        value: String,
    },
    SetInnerHtml(String),
    ParentInsert(Vec<Item>, Placement),
    Before(Vec<Item>),
    After(Vec<Item>),
    ReplaceWith(Vec<Item>),
    Remove,
    SpliceData {
        offset: usize,
        count: usize,
        data: String,
    },
    SetData(String),
    SplitText(usize),
    Nothing,
}

struct Args<'a> {
    member: Member,
    args: &'a [Arg],
}

impl Args<'_> {
    fn get(&self, index: usize) -> Result<&Arg, DomError> {
        self.args.get(index).ok_or(DomError::MissingArgument {
            member: self.member,
            index,
        })
    }

    fn invalid(&self, index: usize, reason: &'static str) -> DomError {
        DomError::InvalidArgument {
            member: self.member,
            index,
            reason,
        }
    }

    fn node(&self, index: usize) -> Result<NodeId, DomError> {
        match self.get(index)? {
            Arg::Node(node) => Ok(*node),
            _ => Err(self.invalid(index, "expected a node")),
        }
    }

    fn optional_node(&self, index: usize) -> Result<Option<NodeId>, DomError> {
        match self.get(index)? {
            Arg::Node(node) => Ok(Some(*node)),
            Arg::Null => Ok(None),
            Arg::Str(_) => Err(self.invalid(index, "expected a node or null")),
        }
    }

    fn string(&self, index: usize) -> Result<String, DomError> {
        match self.get(index)? {
            Arg::Str(value) => Ok(value.clone()),
            Arg::Null => Ok("null".to_owned()),
            Arg::Node(_) => Err(self.invalid(index, "expected a string")),
        }
    }

    /// Nullable string where null means "empty".
    fn string_or_empty(&self, index: usize) -> Result<String, DomError> {
        match self.get(index)? {
            Arg::Null => Ok(String::new()),
            _ => self.string(index),
        }
    }

    fn offset(&self, index: usize) -> Result<usize, DomError> {
        let raw = match self.get(index)? {
            Arg::Str(value) => value,
            _ => return Err(self.invalid(index, "expected an offset")),
        };
        if let Ok(value) = raw.parse::<usize>() {
            return Ok(value);
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.trunc() as usize),
            _ => Err(self.invalid(index, "expected a non-negative integer")),
        }
    }

    fn optional_bool(&self, index: usize) -> Result<Option<bool>, DomError> {
        match self.args.get(index) {
            None => Ok(None),
            Some(Arg::Null) => Ok(Some(false)),
            Some(Arg::Str(value)) => match value.as_str() {
                "true" => Ok(Some(true)),
                "false" | "" | "0" => Ok(Some(false)),
                _ => Ok(Some(true)),
            },
            Some(Arg::Node(_)) => Ok(Some(true)),
        }
    }

    fn items(&self) -> Vec<Item> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Node(node) => Item::Node(*node),
                Arg::Str(value) => Item::Text(value.clone()),
                Arg::Null => Item::Text("null".to_owned()),
            })
            .collect()
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map_or(value.len(), |(index, _)| index)
}

fn valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

impl DomTree {
    // ── Observer management ────────────────────────────────────────────────

    /// Installs `observer` for every node of this tree, returning the previous one.
    pub fn set_observer(
        &mut self,
        observer: Box<dyn MutationObserver>,
    ) -> Option<Box<dyn MutationObserver>> {
        self.observer.replace(observer)
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn MutationObserver>> {
        self.observer.take()
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    // ── Dispatch ───────────────────────────────────────────────────────────

    /// Calls `member` on `target` with untyped arguments.
    ///
    /// This is the path every typed member method takes.
    pub fn invoke(
        &mut self,
        target: NodeId,
        member: Member,
        args: Vec<Arg>,
    ) -> Result<Outcome, DomError> {
        let call = self.plan(target, member, &args)?;
        let outermost = self.depth == 0;
        if outermost {
            if let Some(mut observer) = self.observer.take() {
                observer.on_mutation(self, target, member, &args);
                self.observer = Some(observer);
            }
        }
        self.depth += 1;
        let outcome = self.perform(target, call);
        self.depth -= 1;
        if outermost {
            if let Some(mut observer) = self.observer.take() {
                observer.after_mutation(self, target, member);
                self.observer = Some(observer);
            }
        }
        outcome
    }

    fn plan(&self, target: NodeId, member: Member, args: &[Arg]) -> Result<Call, DomError> {
        let kind = self.kind(target);
        if !surface::declares(kind, member.name()) {
            return Err(DomError::NotSupported { member, kind });
        }
        let a = Args { member, args };
        let call = match member {
            Member::AppendChild => {
                let node = a.node(0)?;
                self.ensure_insertable(target, node)?;
                Call::Insert { node, before: None }
            }
            Member::InsertBefore => {
                let node = a.node(0)?;
                let reference = a.optional_node(1)?;
                if let Some(reference) = reference {
                    self.ensure_child(target, reference)?;
                }
                self.ensure_insertable(target, node)?;
                let before = match reference {
                    Some(r) if r == node => self.next_sibling(node),
                    other => other,
                };
                Call::Insert { node, before }
            }
            Member::RemoveChild => {
                let child = a.node(0)?;
                self.ensure_child(target, child)?;
                Call::RemoveChild(child)
            }
            Member::ReplaceChild => {
                let node = a.node(0)?;
                let child = a.node(1)?;
                self.ensure_child(target, child)?;
                self.ensure_insertable(target, node)?;
                Call::ReplaceChild { node, child }
            }
            Member::Normalize => Call::Normalize,
            Member::TextContent => Call::SetTextContent(a.string_or_empty(0)?),
            Member::NodeValue => Call::SetNodeValue(a.string_or_empty(0)?),
            Member::SetAttribute => {
                let name = Self::attribute_name(a.string(0)?)?;
                Call::SetAttribute {
                    name,
                    value: a.string(1)?,
                }
            }
            Member::RemoveAttribute => {
                Call::RemoveAttribute(Self::attribute_name(a.string(0)?)?)
            }
            Member::ToggleAttribute => Call::ToggleAttribute {
                name: Self::attribute_name(a.string(0)?)?,
                force: a.optional_bool(1)?,
            },
            Member::Id => Call::SetReflected {
                attribute: "id",
                value: a.string(0)?,
            },
            Member::ClassName => Call::SetReflected {
                attribute: "class",
                value: a.string(0)?,
            },
            Member::InnerHtml => Call::SetInnerHtml(a.string_or_empty(0)?),
            Member::Append | Member::Prepend | Member::ReplaceChildren => {
                let items = a.items();
                self.ensure_items_insertable(target, &items)?;
                let placement = match member {
                    Member::Append => Placement::Last,
                    Member::Prepend => Placement::First,
                    _ => Placement::Replace,
                };
                Call::ParentInsert(items, placement)
            }
            Member::Before | Member::After | Member::ReplaceWith => {
                let Some(parent) = self.parent(target) else {
                    return Ok(Call::Nothing);
                };
                let items = a.items();
                self.ensure_items_insertable(parent, &items)?;
                match member {
                    Member::Before => Call::Before(items),
                    Member::After => Call::After(items),
                    _ => Call::ReplaceWith(items),
                }
            }
            Member::Remove => Call::Remove,
            Member::AppendData => {
                let length = self.data_length(target);
                Call::SpliceData {
                    offset: length,
                    count: 0,
                    data: a.string(0)?,
                }
            }
            Member::InsertData => {
                let offset = self.ensure_offset(target, a.offset(0)?)?;
                Call::SpliceData {
                    offset,
                    count: 0,
                    data: a.string(1)?,
                }
            }
            Member::DeleteData => Call::SpliceData {
                offset: self.ensure_offset(target, a.offset(0)?)?,
                count: a.offset(1)?,
                data: String::new(),
            },
            Member::ReplaceData => Call::SpliceData {
                offset: self.ensure_offset(target, a.offset(0)?)?,
                count: a.offset(1)?,
                data: a.string(2)?,
            },
            Member::Data => Call::SetData(a.string_or_empty(0)?),
            Member::SplitText => Call::SplitText(self.ensure_offset(target, a.offset(0)?)?),
        };
        Ok(call)
    }

    fn ensure_child(&self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        if self.parent(node) == Some(parent) {
            Ok(())
        } else {
            Err(DomError::NotFound { parent, node })
        }
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_kind = self.kind(parent);
        let allowed = parent_kind.is_parent()
            && !self.contains(child, parent)
            && match (parent_kind, self.kind(child)) {
                (_, NodeKind::Document) => false,
                (NodeKind::Document, NodeKind::Text) => false,
                (NodeKind::Element, NodeKind::Doctype) => false,
                _ => true,
            };
        if allowed {
            Ok(())
        } else {
            Err(DomError::HierarchyRequest { parent, child })
        }
    }

    fn ensure_items_insertable(&self, parent: NodeId, items: &[Item]) -> Result<(), DomError> {
        for item in items {
            match item {
                Item::Node(node) => self.ensure_insertable(parent, *node)?,
                Item::Text(_) if self.kind(parent) == NodeKind::Document => {
                    return Err(DomError::HierarchyRequest {
                        parent,
                        child: parent,
                    });
                }
                Item::Text(_) => {}
            }
        }
        Ok(())
    }

    fn attribute_name(name: String) -> Result<String, DomError> {
        if !valid_attribute_name(&name) {
            return Err(DomError::InvalidCharacter(name));
        }
        Ok(name.to_ascii_lowercase())
    }

    fn data_length(&self, target: NodeId) -> usize {
        self.character_data(target).map_or(0, char_len)
    }

    fn ensure_offset(&self, target: NodeId, offset: usize) -> Result<usize, DomError> {
        let length = self.data_length(target);
        if offset > length {
            Err(DomError::IndexSize { offset, length })
        } else {
            Ok(offset)
        }
    }

    // ── Perform ────────────────────────────────────────────────────────────

    fn perform(&mut self, target: NodeId, call: Call) -> Result<Outcome, DomError> {
        match call {
            Call::Insert { node, before } => {
                self.insert_raw(target, node, before);
                Ok(Outcome::Node(node))
            }
            Call::RemoveChild(child) => {
                self.detach(child);
                Ok(Outcome::Node(child))
            }
            Call::ReplaceChild { node, child } => {
                if node != child {
                    let mut before = self.next_sibling(child);
                    if before == Some(node) {
                        before = self.next_sibling(node);
                    }
                    self.detach(child);
                    self.insert_raw(target, node, before);
                }
                Ok(Outcome::Node(child))
            }
            Call::Normalize => {
                self.normalize_raw(target);
                Ok(Outcome::Unit)
            }
            Call::SetTextContent(value) => {
                match self.kind(target) {
                    NodeKind::Element => {
                        self.clear_children(target);
                        if !value.is_empty() {
                            let text = self.create_text_node(&value);
                            self.insert_raw(target, text, None);
                        }
                    }
                    NodeKind::Text | NodeKind::Comment => self.set_data_raw(target, value),
                    NodeKind::Document | NodeKind::Doctype => {}
                }
                Ok(Outcome::Unit)
            }
            Call::SetNodeValue(value) => {
                if self.kind(target).is_character_data() {
                    self.set_data_raw(target, value);
                }
                Ok(Outcome::Unit)
            }
            Call::SetAttribute { name, value } => {
                if let NodeData::Element { attrs, .. } = self.data_mut(target) {
                    match attrs.iter_mut().find(|(key, _)| *key == name) {
                        Some(slot) => slot.1 = value,
                        None => attrs.push((name, value)),
                    }
                }
                Ok(Outcome::Unit)
            }
            Call::RemoveAttribute(name) => {
                if let NodeData::Element { attrs, .. } = self.data_mut(target) {
                    attrs.retain(|(key, _)| *key != name);
                }
                Ok(Outcome::Unit)
            }
            Call::ToggleAttribute { name, force } => {
                let present = self.get_attribute(target, &name).is_some();
                let wanted = force.unwrap_or(!present);
                if wanted && !present {
                    self.invoke(target, Member::SetAttribute, vec![name.into(), "".into()])?;
                } else if !wanted && present {
                    self.invoke(target, Member::RemoveAttribute, vec![name.into()])?;
                }
                Ok(Outcome::Bool(wanted))
            }
            Call::SetReflected { attribute, value } => {
                self.invoke(target, Member::SetAttribute, vec![attribute.into(), value.into()])?;
                Ok(Outcome::Unit)
            }
            Call::SetInnerHtml(markup) => {
                let context = self.tag_name(target).unwrap_or("body").to_owned();
                let nodes = parse::parse_fragment_into(self, &context, &markup);
                self.clear_children(target);
                for node in nodes {
                    self.insert_raw(target, node, None);
                }
                Ok(Outcome::Unit)
            }
            Call::ParentInsert(items, placement) => {
                let nodes = self.materialize(items);
                for &node in &nodes {
                    self.detach(node);
                }
                let before = match placement {
                    Placement::First => self.children(target).first().copied(),
                    Placement::Last => None,
                    Placement::Replace => {
                        self.clear_children(target);
                        None
                    }
                };
                self.insert_all(target, nodes, before);
                Ok(Outcome::Unit)
            }
            Call::Before(items) => {
                let parent = self.require_parent(target);
                let nodes = self.materialize(items);
                let viable_prev = self.viable_sibling(target, &nodes, false);
                for &node in &nodes {
                    self.detach(node);
                }
                let before = match viable_prev {
                    Some(prev) => self.next_sibling(prev),
                    None => self.children(parent).first().copied(),
                };
                self.insert_all(parent, nodes, before);
                Ok(Outcome::Unit)
            }
            Call::After(items) => {
                let parent = self.require_parent(target);
                let nodes = self.materialize(items);
                let viable_next = self.viable_sibling(target, &nodes, true);
                self.insert_all(parent, nodes, viable_next);
                Ok(Outcome::Unit)
            }
            Call::ReplaceWith(items) => {
                let parent = self.require_parent(target);
                let nodes = self.materialize(items);
                let viable_next = self.viable_sibling(target, &nodes, true);
                if self.parent(target) == Some(parent) && !nodes.contains(&target) {
                    self.detach(target);
                }
                self.insert_all(parent, nodes, viable_next);
                Ok(Outcome::Unit)
            }
            Call::Remove => {
                self.detach(target);
                Ok(Outcome::Unit)
            }
            Call::SpliceData {
                offset,
                count,
                data,
            } => {
                let current = self.character_data(target).unwrap_or_default().to_owned();
                let start = byte_offset(&current, offset);
                let end = byte_offset(&current, offset.saturating_add(count));
                let mut next = String::with_capacity(current.len() + data.len());
                next.push_str(&current[..start]);
                next.push_str(&data);
                next.push_str(&current[end..]);
                self.set_data_raw(target, next);
                Ok(Outcome::Unit)
            }
            Call::SetData(value) => {
                self.set_data_raw(target, value);
                Ok(Outcome::Unit)
            }
            Call::SplitText(offset) => {
                let current = self.character_data(target).unwrap_or_default().to_owned();
                let split = byte_offset(&current, offset);
                let tail = self.create_text_node(&current[split..]);
                self.set_data_raw(target, current[..split].to_owned());
                if let Some(parent) = self.parent(target) {
                    let before = self.next_sibling(target);
                    self.insert_raw(parent, tail, before);
                }
                Ok(Outcome::Node(tail))
            }
            Call::Nothing => Ok(Outcome::Unit),
        }
    }

    fn require_parent(&self, target: NodeId) -> NodeId {
        // Calls without a parent are planned as `Call::Nothing`.
        self.parent(target).unwrap_or(target)
    }

    fn set_data_raw(&mut self, target: NodeId, value: String) {
        if let NodeData::Text(data) | NodeData::Comment(data) = self.data_mut(target) {
            *data = value;
        }
    }

    /// Turns string items into fresh text nodes.
    fn materialize(&mut self, items: Vec<Item>) -> Vec<NodeId> {
        items
            .into_iter()
            .map(|item| match item {
                Item::Node(node) => node,
                Item::Text(text) => self.create_text_node(&text),
            })
            .collect()
    }

    /// Nearest sibling of `target` (following when `forward`) that is not in `nodes`.
    fn viable_sibling(&self, target: NodeId, nodes: &[NodeId], forward: bool) -> Option<NodeId> {
        let step = |n: NodeId| {
            if forward {
                self.next_sibling(n)
            } else {
                self.previous_sibling(n)
            }
        };
        let mut current = step(target);
        while let Some(node) = current {
            if !nodes.contains(&node) {
                return Some(node);
            }
            current = step(node);
        }
        None
    }

    fn insert_all(&mut self, parent: NodeId, nodes: Vec<NodeId>, before: Option<NodeId>) {
        for node in nodes {
            self.insert_raw(parent, node, before);
        }
    }

    fn normalize_raw(&mut self, node: NodeId) {
        let mut index = 0;
        while let Some(&child) = self.children(node).get(index) {
            if self.kind(child) != NodeKind::Text {
                self.normalize_raw(child);
                index += 1;
                continue;
            }
            while let Some(&next) = self.children(node).get(index + 1) {
                if self.kind(next) != NodeKind::Text {
                    break;
                }
                let tail = self.character_data(next).unwrap_or_default().to_owned();
                let mut merged = self.character_data(child).unwrap_or_default().to_owned();
                merged.push_str(&tail);
                self.set_data_raw(child, merged);
                self.detach(next);
            }
            if self.data_length(child) == 0 {
                self.detach(child);
            } else {
                index += 1;
            }
        }
    }

    // ── Typed members ──────────────────────────────────────────────────────

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.invoke(parent, Member::AppendChild, vec![child.into()])
            .map(expect_node)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let reference = reference.map_or(Arg::Null, Arg::Node);
        self.invoke(parent, Member::InsertBefore, vec![node.into(), reference])
            .map(expect_node)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.invoke(parent, Member::RemoveChild, vec![child.into()])
            .map(expect_node)
    }

    pub fn replace_child(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: NodeId,
    ) -> Result<NodeId, DomError> {
        self.invoke(parent, Member::ReplaceChild, vec![node.into(), child.into()])
            .map(expect_node)
    }

    pub fn normalize(&mut self, node: NodeId) -> Result<(), DomError> {
        self.invoke(node, Member::Normalize, Vec::new()).map(drop)
    }

    pub fn set_text_content(&mut self, node: NodeId, value: Option<&str>) -> Result<(), DomError> {
        self.invoke(node, Member::TextContent, vec![value.into()]).map(drop)
    }

    pub fn set_node_value(&mut self, node: NodeId, value: Option<&str>) -> Result<(), DomError> {
        self.invoke(node, Member::NodeValue, vec![value.into()]).map(drop)
    }

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.invoke(element, Member::SetAttribute, vec![name.into(), value.into()])
            .map(drop)
    }

    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<(), DomError> {
        self.invoke(element, Member::RemoveAttribute, vec![name.into()])
            .map(drop)
    }

    pub fn toggle_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> Result<bool, DomError> {
        let mut args = vec![Arg::from(name)];
        if let Some(force) = force {
            args.push(force.into());
        }
        match self.invoke(element, Member::ToggleAttribute, args)? {
            Outcome::Bool(value) => Ok(value),
            other => unreachable!("toggleAttribute returned {other:?}"),
        }
    }

    pub fn set_id(&mut self, element: NodeId, value: &str) -> Result<(), DomError> {
        self.invoke(element, Member::Id, vec![value.into()]).map(drop)
    }

    pub fn set_class_name(&mut self, element: NodeId, value: &str) -> Result<(), DomError> {
        self.invoke(element, Member::ClassName, vec![value.into()])
            .map(drop)
    }

    pub fn set_inner_html(&mut self, element: NodeId, markup: &str) -> Result<(), DomError> {
        self.invoke(element, Member::InnerHtml, vec![markup.into()])
            .map(drop)
    }

    pub fn append(&mut self, parent: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(parent, Member::Append, items).map(drop)
    }

    pub fn prepend(&mut self, parent: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(parent, Member::Prepend, items).map(drop)
    }

    pub fn replace_children(&mut self, parent: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(parent, Member::ReplaceChildren, items).map(drop)
    }

    pub fn before(&mut self, node: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(node, Member::Before, items).map(drop)
    }

    pub fn after(&mut self, node: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(node, Member::After, items).map(drop)
    }

    pub fn replace_with(&mut self, node: NodeId, items: Vec<Arg>) -> Result<(), DomError> {
        self.invoke(node, Member::ReplaceWith, items).map(drop)
    }

    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.invoke(node, Member::Remove, Vec::new()).map(drop)
    }

    pub fn append_data(&mut self, node: NodeId, data: &str) -> Result<(), DomError> {
        self.invoke(node, Member::AppendData, vec![data.into()]).map(drop)
    }

    pub fn insert_data(&mut self, node: NodeId, offset: usize, data: &str) -> Result<(), DomError> {
        self.invoke(node, Member::InsertData, vec![offset.into(), data.into()])
            .map(drop)
    }

    pub fn delete_data(&mut self, node: NodeId, offset: usize, count: usize) -> Result<(), DomError> {
        self.invoke(node, Member::DeleteData, vec![offset.into(), count.into()])
            .map(drop)
    }

    pub fn replace_data(
        &mut self,
        node: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<(), DomError> {
        self.invoke(
            node,
            Member::ReplaceData,
            vec![offset.into(), count.into(), data.into()],
        )
        .map(drop)
    }

    pub fn set_data(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.invoke(node, Member::Data, vec![value.into()]).map(drop)
    }

    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId, DomError> {
        self.invoke(node, Member::SplitText, vec![offset.into()])
            .map(expect_node)
    }
}

fn expect_node(outcome: Outcome) -> NodeId {
    match outcome {
        Outcome::Node(node) => node,
        other => unreachable!("member returned {other:?} instead of a node"),
    }
}
