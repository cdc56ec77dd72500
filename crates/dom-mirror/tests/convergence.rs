mod common;

use common::{assert_converged, mirror, replay};
use dom_mirror::{
    instantiate, serialize_node, Capture, CaptureError, CaptureMode, Message, MirrorConfig,
    Patch, SerializedArg, SerializedNode,
};
use dom_mirror_tree::{Arg, DomTree, NodeId};
use proptest::prelude::*;

const PAGE: &str = "<!DOCTYPE html><html><head><title>t</title></head><body>\
                    <div id=\"a\"><span>x</span></div>\
                    <p class=\"intro\">hello <b>world</b><!--note--></p>\
                    </body></html>";

fn patches(messages: &[Message]) -> Vec<Patch> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Patch(p) => Some(p.clone()),
            Message::Snapshot { .. } => None,
        })
        .collect()
}

#[test]
fn append_child_with_inline_button() {
    let config = MirrorConfig {
        send_initial_snapshot: false,
        ..MirrorConfig::default()
    };
    let (mut primary, handle) = mirror("<div id=a><span>x</span></div>", &config);
    let div = primary.get_element_by_id("a").unwrap();
    let button = primary.create_element("button");
    let label = primary.create_text_node("y");
    primary.append_child(button, label).unwrap();
    primary.append_child(div, button).unwrap();

    let sent = patches(&handle.channel());
    assert_eq!(
        sent,
        vec![Patch {
            target_path: vec![0, 1, 0],
            member: "appendChild".into(),
            args: vec![SerializedArg::InlineNode(
                SerializedNode::element("button").with_child(SerializedNode::text("y"))
            )],
        }]
    );
    // The replica starts from the same markup the primary was parsed from.
    let mut replica = replay(&[Message::Snapshot {
        new_html: "<div id=a><span>x</span></div>".into(),
    }]);
    replica.apply(&Message::Patch(sent[0].clone())).unwrap();
    let replica_div = replica.tree().get_element_by_id("a").unwrap();
    assert_eq!(
        replica.tree().outer_html(replica_div),
        r#"<div id="a"><span>x</span><button>y</button></div>"#
    );
}

#[test]
fn repeated_set_attribute_is_idempotent() {
    let (mut primary, handle) = mirror(PAGE, &MirrorConfig::default());
    let div = primary.get_element_by_id("a").unwrap();
    primary.set_attribute(div, "data-k", "v").unwrap();
    primary.set_attribute(div, "data-k", "v").unwrap();

    let sent = patches(&handle.channel());
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_converged(&primary, &handle);
}

#[test]
fn split_text_creates_sibling() {
    let (mut primary, handle) = mirror("<p>hello</p>", &MirrorConfig::default());
    let p = primary.children(primary.body().unwrap())[0];
    let text = primary.children(p)[0];
    let tail = primary.split_text(text, 2).unwrap();
    assert_eq!(primary.character_data(tail), Some("llo"));

    let replica = replay(&handle.channel());
    let replica_p = replica.tree().children(replica.tree().body().unwrap())[0];
    let parts: Vec<_> = replica
        .tree()
        .children(replica_p)
        .iter()
        .map(|&n| replica.tree().character_data(n).unwrap().to_owned())
        .collect();
    assert_eq!(parts, ["he", "llo"]);
}

#[test]
fn moves_and_removals_converge() {
    let (mut primary, handle) = mirror(PAGE, &MirrorConfig::default());
    let body = primary.body().unwrap();
    let div = primary.get_element_by_id("a").unwrap();
    let p = primary.children(body)[1];
    primary.insert_before(body, p, Some(div)).unwrap();
    let span = primary.children(div)[0];
    primary.remove(span).unwrap();
    primary.set_id(span, "moved").unwrap();
    primary.append(p, vec![Arg::Node(span), Arg::from("tail")]).unwrap();
    primary.set_inner_html(div, "<em>new</em> markup").unwrap();
    primary.toggle_attribute(p, "hidden", None).unwrap();
    primary.normalize(p).unwrap();

    // The id change happened while `span` was detached and is carried by the
    // inline serialization of the later append.
    let errors = handle.take_errors();
    assert_eq!(errors.len(), 1);
    let replica = replay(&handle.channel());
    assert_eq!(replica.html(), primary.to_html());
}

#[test]
fn character_data_edits_converge() {
    let (mut primary, handle) = mirror(PAGE, &MirrorConfig::default());
    let p = primary.children(primary.body().unwrap())[1];
    let text = primary.children(p)[0];
    let comment = primary.children(p)[2];
    primary.insert_data(text, 0, "¡").unwrap();
    primary.replace_data(text, 1, 5, "bye").unwrap();
    primary.delete_data(text, 0, 1).unwrap();
    primary.append_data(comment, " again").unwrap();
    primary.set_data(comment, "replaced").unwrap();
    primary.before(comment, vec![Arg::from("x"), Arg::Null]).unwrap();
    assert_converged(&primary, &handle);
}

#[test]
fn snapshot_mode_coalesces_and_converges() {
    let config = MirrorConfig {
        mode: CaptureMode::Snapshot,
        ..MirrorConfig::default()
    };
    let (mut primary, handle) = mirror(PAGE, &config);
    let div = primary.get_element_by_id("a").unwrap();
    primary.set_class_name(div, "box").unwrap();
    primary.set_class_name(div, "box").unwrap();
    primary.set_attribute(div, "class", "box").unwrap();
    let messages = handle.channel().clone();
    assert_eq!(messages.len(), 2);
    assert!(messages
        .iter()
        .all(|m| matches!(m, Message::Snapshot { .. })));
    assert_eq!(replay(&messages).html(), primary.to_html());
}

#[test]
fn capture_addresses_from_the_document() {
    let mut primary = DomTree::parse_document("<div id=a></div>");
    let body = primary.body().unwrap();
    let rejected = Capture::install(
        &mut primary,
        body,
        &MirrorConfig::default(),
        Vec::<Message>::new(),
    );
    assert!(matches!(rejected, Err(CaptureError::RootNotDocument)));

    let (mut primary, handle) = mirror("<div id=a></div>", &MirrorConfig::default());
    let div = primary.get_element_by_id("a").unwrap();
    primary.set_attribute(div, "k", "v").unwrap();
    let sent = patches(&handle.channel());
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].target_path, vec![0, 1, 0]);
    assert_converged(&primary, &handle);
}

#[test]
fn preformatted_and_noscript_content_converge() {
    let markup = "<pre>\n\nx</pre><textarea>\n\ny</textarea><noscript><p>a&b</p></noscript>";
    for mode in [CaptureMode::Patch, CaptureMode::Snapshot] {
        let config = MirrorConfig {
            mode,
            ..MirrorConfig::default()
        };
        let (mut primary, handle) = mirror(markup, &config);
        let body = primary.body().unwrap();
        let pre = primary.children(body)[0];
        primary.set_attribute(pre, "class", "c").unwrap();
        assert!(primary.to_html().contains("<pre class=\"c\">\n\nx</pre>"));
        assert_converged(&primary, &handle);
    }
}

#[test]
fn inline_node_round_trip() {
    let mut source = DomTree::new();
    let list = source.create_element_with_attrs(
        "ul",
        vec![("class".into(), "l".into()), ("data-x".into(), "1".into())],
    );
    for label in ["one", "two"] {
        let item = source.create_element("li");
        let text = source.create_text_node(label);
        source.append_child(item, text).unwrap();
        source.append_child(list, item).unwrap();
    }
    let note = source.create_comment("end");
    source.append_child(list, note).unwrap();

    let serialized = serialize_node(&source, list).unwrap();
    let mut target = DomTree::new();
    let copy = instantiate(&mut target, &serialized).unwrap();
    assert_eq!(target.outer_html(copy), source.outer_html(list));
    assert_eq!(serialize_node(&target, copy).unwrap(), serialized);
}

// ── Random mutation sequences ─────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    AppendElement { parent: usize, tag: usize },
    AppendText { parent: usize, text: String },
    InsertBefore { parent: usize, node: usize, reference: usize },
    Remove(usize),
    SetAttribute { node: usize, name: usize, value: String },
    RemoveAttribute { node: usize, name: usize },
    ToggleAttribute(usize),
    SetTextContent { node: usize, text: Option<String> },
    AppendData { node: usize, text: String },
    SplitText { node: usize, offset: usize },
    Normalize(usize),
    InnerHtml { node: usize, markup: usize },
    ReplaceWith { node: usize, with: usize },
    Prepend { node: usize, text: String },
}

const TAGS: &[&str] = &["div", "span", "p", "ul", "li", "b"];
const NAMES: &[&str] = &["id", "class", "title", "data-n"];
const MARKUP: &[&str] = &["", "<i>a</i>b", "<p>x</p><!--c-->", "plain &amp; text"];

fn op() -> impl Strategy<Value = Op> {
    let ix = 0usize..64;
    let text = "[a-z ]{0,6}";
    let structural = prop_oneof![
        (ix.clone(), 0..TAGS.len()).prop_map(|(parent, tag)| Op::AppendElement { parent, tag }),
        (ix.clone(), text).prop_map(|(parent, text)| Op::AppendText { parent, text }),
        (ix.clone(), ix.clone(), ix.clone())
            .prop_map(|(parent, node, reference)| Op::InsertBefore { parent, node, reference }),
        ix.clone().prop_map(Op::Remove),
        ix.clone().prop_map(Op::Normalize),
        (ix.clone(), 0..MARKUP.len()).prop_map(|(node, markup)| Op::InnerHtml { node, markup }),
        (ix.clone(), ix.clone()).prop_map(|(node, with)| Op::ReplaceWith { node, with }),
    ];
    let content = prop_oneof![
        (ix.clone(), 0..NAMES.len(), text)
            .prop_map(|(node, name, value)| Op::SetAttribute { node, name, value }),
        (ix.clone(), 0..NAMES.len()).prop_map(|(node, name)| Op::RemoveAttribute { node, name }),
        ix.clone().prop_map(Op::ToggleAttribute),
        (ix.clone(), proptest::option::of(text))
            .prop_map(|(node, text)| Op::SetTextContent { node, text }),
        (ix.clone(), text).prop_map(|(node, text)| Op::AppendData { node, text }),
        (ix.clone(), 0usize..8).prop_map(|(node, offset)| Op::SplitText { node, offset }),
        (ix, text).prop_map(|(node, text)| Op::Prepend { node, text }),
    ];
    prop_oneof![structural, content]
}

fn pick(pool: &[NodeId], i: usize) -> NodeId {
    pool[i % pool.len()]
}

/// Applies `op` to the primary, ignoring calls the tree rejects.
fn apply(tree: &mut DomTree, pool: &mut Vec<NodeId>, op: &Op) {
    match op {
        Op::AppendElement { parent, tag } => {
            let parent = pick(pool, *parent);
            let node = tree.create_element(TAGS[*tag]);
            pool.push(node);
            let _ = tree.append_child(parent, node);
        }
        Op::AppendText { parent, text } => {
            let parent = pick(pool, *parent);
            let node = tree.create_text_node(text);
            pool.push(node);
            let _ = tree.append_child(parent, node);
        }
        Op::InsertBefore {
            parent,
            node,
            reference,
        } => {
            let parent = pick(pool, *parent);
            let reference = tree.children(parent).get(*reference % 4).copied();
            let _ = tree.insert_before(parent, pick(pool, *node), reference);
        }
        Op::Remove(node) => {
            let _ = tree.remove(pick(pool, *node));
        }
        Op::SetAttribute { node, name, value } => {
            let _ = tree.set_attribute(pick(pool, *node), NAMES[*name], value);
        }
        Op::RemoveAttribute { node, name } => {
            let _ = tree.remove_attribute(pick(pool, *node), NAMES[*name]);
        }
        Op::ToggleAttribute(node) => {
            let _ = tree.toggle_attribute(pick(pool, *node), "hidden", None);
        }
        Op::SetTextContent { node, text } => {
            let _ = tree.set_text_content(pick(pool, *node), text.as_deref());
        }
        Op::AppendData { node, text } => {
            let _ = tree.append_data(pick(pool, *node), text);
        }
        Op::SplitText { node, offset } => {
            if let Ok(tail) = tree.split_text(pick(pool, *node), *offset) {
                pool.push(tail);
            }
        }
        Op::Normalize(node) => {
            let _ = tree.normalize(pick(pool, *node));
        }
        Op::InnerHtml { node, markup } => {
            let _ = tree.set_inner_html(pick(pool, *node), MARKUP[*markup]);
        }
        Op::ReplaceWith { node, with } => {
            let _ = tree.replace_with(pick(pool, *node), vec![Arg::Node(pick(pool, *with))]);
        }
        Op::Prepend { node, text } => {
            let _ = tree.prepend(pick(pool, *node), vec![Arg::from(text.as_str())]);
        }
    }
}

proptest! {
    #[test]
    fn replay_converges_on_random_mutations(ops in prop::collection::vec(op(), 1..40)) {
        let (mut primary, handle) = mirror(PAGE, &MirrorConfig::default());
        let body = primary.body().unwrap();
        let mut pool = vec![body];
        pool.extend(primary.descendants(body));
        for op in &ops {
            apply(&mut primary, &mut pool, op);
        }
        // Only mutations of detached nodes may fail to encode.
        for error in handle.take_errors() {
            prop_assert!(
                matches!(
                    error,
                    dom_mirror::CaptureError::Encode(dom_mirror::EncodeError::Unreachable { .. })
                ),
                "unexpected capture error: {}",
                error
            );
        }
        let replica = replay(&handle.channel());
        prop_assert_eq!(replica.html(), primary.to_html());
    }
}
