//! Live mirroring of a document tree.
//!
//! The primary side installs [`Capture`] on the [`DomTree`] a test mutates.
//! Every mutating member call becomes a [`Message`] on a [`PatchChannel`],
//! and a [`Replicator`] on the other end replays the messages onto its own
//! tree, keeping it structurally identical to the primary.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`discovery`] | the spy set of mutating members, computed once per process |
//! [`capture`] | [`Capture`], the observer installed on the primary tree |
//! [`encode`] | [`PatchEncoder`]: live calls → [`Patch`] |
//! [`patch`] | [`Patch`], [`SerializedArg`], [`SerializedNode`], [`Message`] |
//! [`codec`] | the JSON wire format |
//! [`channel`] | [`PatchChannel`] and its transports |
//! [`replicate`] | [`Replicator`] |
//! [`config`] | [`MirrorConfig`] |
//!
//! # Example
//!
//! ```
//! use dom_mirror::{Capture, Message, MirrorConfig, Replicator};
//! use dom_mirror_tree::DomTree;
//!
//! let mut primary = DomTree::parse_document("<div id=a><span>x</span></div>");
//! let root = primary.document();
//! let recorder: Vec<Message> = Vec::new();
//! let handle = Capture::install(&mut primary, root, &MirrorConfig::default(), recorder).unwrap();
//!
//! let div = primary.get_element_by_id("a").unwrap();
//! let button = primary.create_element("button");
//! primary.set_text_content(button, Some("y")).unwrap();
//! primary.append_child(div, button).unwrap();
//!
//! let mut replica = Replicator::new();
//! for message in handle.channel().iter() {
//!     replica.apply(message).unwrap();
//! }
//! assert_eq!(replica.html(), primary.to_html());
//! ```

pub use dom_mirror_tree::DomTree;

pub mod capture;
pub mod channel;
pub mod codec;
pub mod config;
pub mod discovery;
pub mod encode;
pub mod patch;
pub mod replicate;

pub use capture::{Capture, CaptureError, CaptureHandle};
pub use channel::{read_ndjson, read_ndjson_numbered, ChannelError, NdjsonChannel, PatchChannel};
pub use codec::CodecError;
pub use config::{CaptureMode, ConfigError, MirrorConfig, UnreachablePolicy};
pub use discovery::{spy_set, DiscoveryError, SpySet};
pub use encode::{serialize_node, EncodeError, PatchEncoder};
pub use patch::{Message, Patch, SerializedArg, SerializedNode};
pub use replicate::{instantiate, ReplicaError, Replicator};
