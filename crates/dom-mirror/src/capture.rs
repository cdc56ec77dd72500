//! Mutation capture on the primary tree.
//!
//! [`Capture::install`] puts a [`MutationObserver`] on the primary tree. Every
//! reported call whose member is in the spy set is turned into a message and
//! sent over the session's [`PatchChannel`]: a [`Patch`] per call in patch
//! mode, or the whole document markup in snapshot mode. Capture never changes
//! the tree or the outcome of the call it observes.
//!
//! [`Patch`]: crate::patch::Patch

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use dom_mirror_tree::{Arg, DomTree, Member, MutationObserver, NodeId};
use thiserror::Error;

use crate::channel::{ChannelError, PatchChannel};
use crate::config::{CaptureMode, MirrorConfig, UnreachablePolicy};
use crate::discovery::{self, DiscoveryError, SpySet};
use crate::encode::{EncodeError, PatchEncoder};
use crate::patch::Message;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("the tree already has an observer installed")]
    AlreadyInstalled,
    #[error("capture root must be the document node")]
    RootNotDocument,
}

struct CaptureCore<C> {
    encoder: PatchEncoder,
    spy: &'static SpySet,
    mode: CaptureMode,
    policy: UnreachablePolicy,
    channel: C,
    debounce: Duration,
    last_snapshot: Option<String>,
    last_emit: Option<Instant>,
    pending: bool,
    halted: bool,
    emitted: usize,
    skipped: usize,
    errors: Vec<CaptureError>,
}

impl<C: PatchChannel> CaptureCore<C> {
    fn record(&mut self, error: CaptureError) {
        tracing::warn!(%error, "mutation not captured");
        if self.policy == UnreachablePolicy::Fail {
            tracing::error!("capture halted for the rest of the session");
            self.halted = true;
        }
        self.errors.push(error);
    }

    fn emit(&mut self, message: Message) -> bool {
        match self.channel.send(&message) {
            Ok(()) => {
                self.emitted += 1;
                true
            }
            Err(error) => {
                self.record(error.into());
                false
            }
        }
    }

    fn send_snapshot(&mut self, html: String) -> bool {
        let sent = self.emit(Message::Snapshot {
            new_html: html.clone(),
        });
        if sent {
            self.last_snapshot = Some(html);
            self.last_emit = Some(Instant::now());
            self.pending = false;
        }
        sent
    }

    fn accepts(&mut self, tree: &DomTree, target: NodeId, member: Member) -> bool {
        if self.halted {
            return false;
        }
        let kind = tree.kind(target);
        if !self.spy.is_mutating(kind, member) {
            tracing::warn!(%member, ?kind, "member outside the spy set, skipping");
            self.skipped += 1;
            return false;
        }
        true
    }

    /// Sends `html` unless it equals the last snapshot sent or the debounce
    /// window is still open, in which case it stays pending.
    fn offer_snapshot(&mut self, html: String) {
        if self.last_snapshot.as_deref() == Some(html.as_str()) {
            self.pending = false;
            return;
        }
        let within_window = !self.debounce.is_zero()
            && self
                .last_emit
                .is_some_and(|at| at.elapsed() < self.debounce);
        if within_window {
            self.pending = true;
            return;
        }
        self.send_snapshot(html);
    }
}

struct CaptureObserver<C> {
    core: Rc<RefCell<CaptureCore<C>>>,
    encoding: bool,
}

impl<C: PatchChannel> MutationObserver for CaptureObserver<C> {
    fn on_mutation(&mut self, tree: &DomTree, target: NodeId, member: Member, args: &[Arg]) {
        debug_assert!(!self.encoding, "nested capture while encoding {member}");
        if self.encoding {
            return;
        }
        let mut core = self.core.borrow_mut();
        if core.mode != CaptureMode::Patch || !core.accepts(tree, target, member) {
            return;
        }
        self.encoding = true;
        let encoded = core.encoder.encode(tree, target, member, args);
        self.encoding = false;
        match encoded {
            Ok(patch) => {
                tracing::trace!(%member, path = ?patch.target_path, "captured");
                core.emit(patch.into());
            }
            Err(error) => core.record(error.into()),
        }
    }

    fn after_mutation(&mut self, tree: &DomTree, target: NodeId, member: Member) {
        if self.encoding {
            return;
        }
        let mut core = self.core.borrow_mut();
        if core.mode != CaptureMode::Snapshot || !core.accepts(tree, target, member) {
            return;
        }
        self.encoding = true;
        let html = tree.to_html();
        self.encoding = false;
        core.offer_snapshot(html);
    }
}

/// Installs and removes capture on a primary tree.
pub struct Capture;

impl Capture {
    /// Starts capturing mutations of `tree` addressed relative to `root`,
    /// which must be the document node of `tree`.
    ///
    /// Fails when the tree surface does not pass discovery's shape check,
    /// when `root` is not the document, or when the tree is already observed.
    pub fn install<C: PatchChannel + 'static>(
        tree: &mut DomTree,
        root: NodeId,
        config: &MirrorConfig,
        channel: C,
    ) -> Result<CaptureHandle<C>, CaptureError> {
        let spy = discovery::spy_set()?;
        // Replicas resolve every path from their document.
        if root != tree.document() {
            return Err(CaptureError::RootNotDocument);
        }
        if tree.is_observed() {
            return Err(CaptureError::AlreadyInstalled);
        }
        let mut core = CaptureCore {
            encoder: PatchEncoder::new(root).with_sibling_fallback(config.sibling_fallback),
            spy,
            mode: config.mode,
            policy: config.on_unreachable,
            channel,
            debounce: Duration::from_millis(config.snapshot_debounce_ms),
            last_snapshot: None,
            last_emit: None,
            pending: false,
            halted: false,
            emitted: 0,
            skipped: 0,
            errors: Vec::new(),
        };
        if config.send_initial_snapshot && !core.send_snapshot(tree.to_html()) {
            let error = core.errors.pop();
            return Err(error.unwrap_or(CaptureError::Channel(ChannelError::Closed)));
        }
        let core = Rc::new(RefCell::new(core));
        tree.set_observer(Box::new(CaptureObserver {
            core: Rc::clone(&core),
            encoding: false,
        }));
        tracing::debug!(
            mode = ?config.mode,
            version = spy.version(),
            "capture installed"
        );
        Ok(CaptureHandle { core })
    }

    /// Removes the observer from `tree`. Returns whether one was installed.
    pub fn uninstall(tree: &mut DomTree) -> bool {
        let removed = tree.take_observer().is_some();
        if removed {
            tracing::debug!("capture uninstalled");
        }
        removed
    }
}

/// Caller-side view of a capture session.
///
/// Borrows taken through [`CaptureHandle::channel`] must be released before
/// the tree is mutated again.
pub struct CaptureHandle<C> {
    core: Rc<RefCell<CaptureCore<C>>>,
}

impl<C: PatchChannel> CaptureHandle<C> {
    /// Sends the current markup if snapshot output is pending, ignoring the
    /// debounce window. Returns whether a snapshot was sent.
    pub fn flush(&self, tree: &DomTree) -> bool {
        let mut core = self.core.borrow_mut();
        if core.mode != CaptureMode::Snapshot || core.halted {
            return false;
        }
        let html = tree.to_html();
        if core.last_snapshot.as_deref() == Some(html.as_str()) {
            core.pending = false;
            return false;
        }
        core.send_snapshot(html)
    }

    pub fn has_pending(&self) -> bool {
        self.core.borrow().pending
    }

    /// Messages successfully handed to the channel.
    pub fn emitted(&self) -> usize {
        self.core.borrow().emitted
    }

    /// Reported calls ignored because their member is not mutating.
    pub fn skipped(&self) -> usize {
        self.core.borrow().skipped
    }

    pub fn error_count(&self) -> usize {
        self.core.borrow().errors.len()
    }

    pub fn take_errors(&self) -> Vec<CaptureError> {
        std::mem::take(&mut self.core.borrow_mut().errors)
    }

    pub fn is_halted(&self) -> bool {
        self.core.borrow().halted
    }

    pub fn channel(&self) -> Ref<'_, C> {
        Ref::map(self.core.borrow(), |core| &core.channel)
    }
}
