#![allow(dead_code)]

use dom_mirror::codec::{from_line, to_line};
use dom_mirror::{Capture, CaptureHandle, Message, MirrorConfig, Replicator};
use dom_mirror_tree::DomTree;

/// Parses `markup` and installs capture into an in-memory recorder.
pub fn mirror(markup: &str, config: &MirrorConfig) -> (DomTree, CaptureHandle<Vec<Message>>) {
    let mut tree = DomTree::parse_document(markup);
    let root = tree.document();
    let handle = Capture::install(&mut tree, root, config, Vec::new()).unwrap();
    (tree, handle)
}

/// Replays `messages` on a fresh replica, passing each through the JSON wire
/// format first.
pub fn replay(messages: &[Message]) -> Replicator {
    let mut replica = Replicator::new();
    for message in messages {
        let decoded = from_line(&to_line(message)).unwrap();
        assert_eq!(&decoded, message);
        replica.apply(&decoded).unwrap();
    }
    replica
}

pub fn assert_converged(primary: &DomTree, handle: &CaptureHandle<Vec<Message>>) {
    assert!(
        handle.take_errors().is_empty(),
        "capture recorded errors"
    );
    let replica = replay(&handle.channel());
    assert_eq!(replica.html(), primary.to_html());
}
