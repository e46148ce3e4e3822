//! Decorator over the host history that stamps every entry with its
//! ordering token and depth.
//!
//! Invariant: once `HistoryInterceptor::new` or `on_popstate` has run, the
//! host's current entry carries both fields, even if the entry was created
//! behind the app's back (URL typed by the user, another script, a reload).

use crate::token::{TokenSource, decode_state_seq, encode_seq};
use core_types::{Depth, Seq};
use router_api::{HistoryState, HostHistory};

pub const SEQ_FIELD: &str = "seq";
pub const DEPTH_FIELD: &str = "depth";

/// Token and depth persisted with one host entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mark {
    pub seq: Seq,
    pub depth: Depth,
}

/// Outcome of a back/forward notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub mark: Mark,
    /// The move was requested through `go` rather than by the end user.
    pub app_triggered: bool,
    /// The entry had no token and one was written for it.
    pub synthesized: bool,
}

pub struct HistoryInterceptor<H> {
    host: H,
    tokens: TokenSource,
    depth: Depth,
    pending_go: u32,
    /// Mark of the last entry written through `push_state`/`replace_state`.
    written: Option<Mark>,
}

impl<H: HostHistory> HistoryInterceptor<H> {
    /// Wrap `host`, tagging its current entry as the session start unless it
    /// already carries a token from an earlier load.
    pub fn new(mut host: H, mut tokens: TokenSource) -> Self {
        let depth = match read_mark(host.state()) {
            Some(mark) => {
                log::debug!(
                    target: "navstack.history",
                    "resuming at seq={} depth={}",
                    mark.seq,
                    mark.depth
                );
                tokens.observe(mark.seq);
                mark.depth
            }
            None => {
                let state = stamp(host.state().cloned().unwrap_or_default(), Mark::default());
                let url = host.location().to_string();
                host.replace_state(state, "", Some(&url));
                0
            }
        };
        Self {
            host,
            tokens,
            depth,
            pending_go: 0,
            written: None,
        }
    }

    /// Depth of the entry the interceptor last saw become current.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// `go` calls whose `popstate` has not arrived yet.
    pub fn pending_app_jumps(&self) -> u32 {
        self.pending_go
    }

    pub fn current_mark(&self) -> Option<Mark> {
        read_mark(self.host.state())
    }

    pub fn tokens_mut(&mut self) -> &mut TokenSource {
        &mut self.tokens
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Mark written by the last `push_state`/`replace_state`, cleared on
    /// read. Unlike [`current_mark`](Self::current_mark) it is unaffected by
    /// traversals that happened since the write.
    pub fn take_written(&mut self) -> Option<Mark> {
        self.written.take()
    }

    /// Handle the host's back/forward notification.
    ///
    /// Must run before the router reacts to the same notification.
    pub fn on_popstate(&mut self) -> Traversal {
        let app_triggered = if self.pending_go > 0 {
            self.pending_go -= 1;
            true
        } else {
            false
        };

        let (mark, synthesized) = match read_mark(self.host.state()) {
            Some(mark) => {
                self.tokens.observe(mark.seq);
                (mark, false)
            }
            None => {
                let depth = self.depth.saturating_add(1);
                let mark = Mark {
                    seq: self.tokens.allocate(depth),
                    depth,
                };
                let url = self.host.location().to_string();
                log::debug!(
                    target: "navstack.history",
                    "entry {url} has no token; writing seq={} depth={depth}",
                    mark.seq
                );
                let state = stamp(self.host.state().cloned().unwrap_or_default(), mark);
                self.host.replace_state(state, "", Some(&url));
                (mark, true)
            }
        };

        self.depth = mark.depth;
        log::trace!(
            target: "navstack.history",
            "popstate seq={} depth={} app_triggered={app_triggered}",
            mark.seq,
            mark.depth
        );
        Traversal {
            mark,
            app_triggered,
            synthesized,
        }
    }
}

impl<H: HostHistory> HostHistory for HistoryInterceptor<H> {
    fn push_state(&mut self, state: HistoryState, title: &str, url: Option<&str>) {
        let depth = self.depth.saturating_add(1);
        let mark = Mark {
            seq: self.tokens.allocate(depth),
            depth,
        };
        self.depth = depth;
        log::trace!(
            target: "navstack.history",
            "push_state {url:?} seq={} depth={depth}",
            mark.seq
        );
        self.written = Some(mark);
        self.host.push_state(stamp(state, mark), title, url);
    }

    fn replace_state(&mut self, state: HistoryState, title: &str, url: Option<&str>) {
        let depth = self.depth;
        let mark = Mark {
            seq: self.tokens.allocate(depth),
            depth,
        };
        log::trace!(
            target: "navstack.history",
            "replace_state {url:?} seq={} depth={depth}",
            mark.seq
        );
        self.written = Some(mark);
        self.host.replace_state(stamp(state, mark), title, url);
    }

    fn go(&mut self, delta: i32) -> bool {
        let accepted = self.host.go(delta);
        if accepted {
            self.pending_go += 1;
        }
        accepted
    }

    fn state(&self) -> Option<&HistoryState> {
        self.host.state()
    }

    fn location(&self) -> &str {
        self.host.location()
    }
}

/// Token fields of `state`, if it has a token at all.
///
/// A present but malformed token decodes to `Seq::ZERO`; a missing or
/// malformed depth reads as 0.
pub fn read_mark(state: Option<&HistoryState>) -> Option<Mark> {
    let state = state?;
    if !state.contains_key(SEQ_FIELD) {
        return None;
    }
    let depth = state
        .get(DEPTH_FIELD)
        .and_then(|v| v.as_u64())
        .and_then(|v| Depth::try_from(v).ok())
        .unwrap_or(0);
    Some(Mark {
        seq: decode_state_seq(state.get(SEQ_FIELD)),
        depth,
    })
}

fn stamp(state: HistoryState, mark: Mark) -> HistoryState {
    state
        .with(SEQ_FIELD, encode_seq(mark.seq))
        .with(DEPTH_FIELD, mark.depth)
}
