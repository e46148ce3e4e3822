//! The reconciled stack of visited routes.
//!
//! Invariants:
//! - entries are sorted by `seq`, strictly ascending;
//! - after `reconcile` the last entry is the route that was just confirmed.

use core_types::{Depth, NavIntent, Seq};
use router_api::Route;

/// One visited view transition. Never mutated once it is on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub route: Route,
    pub seq: Seq,
    /// Host depth, when the session tracks it.
    pub depth: Option<Depth>,
}

/// What a reconciliation removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Entries cut off because their token was not older than the new one.
    pub truncated: usize,
    /// The top entry was dropped for a replace.
    pub popped: bool,
}

impl Reconciled {
    pub fn dropped(&self) -> usize {
        self.truncated + usize::from(self.popped)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Stack {
    entries: Vec<Entry>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Fold one completed navigation into the stack.
    ///
    /// The first entry whose token is not older than `entry.seq` marks where
    /// the host history now ends: it and everything after it go. Only when
    /// nothing was cut does a replace drop the top entry.
    pub fn reconcile(&mut self, entry: Entry, intent: NavIntent) -> Reconciled {
        let mut out = Reconciled::default();
        if let Some(i) = self.entries.iter().position(|e| e.seq >= entry.seq) {
            out.truncated = self.entries.len() - i;
            self.entries.truncate(i);
        } else if intent == NavIntent::Replace {
            out.popped = self.entries.pop().is_some();
        }
        self.entries.push(entry);
        out
    }

    /// Whether the top entry has somewhere to go back to.
    ///
    /// With depth tracking this reflects the host history (which may hold
    /// entries from before a reload); otherwise only what this stack saw.
    pub fn can_go_back(&self) -> bool {
        match self.entries.last() {
            Some(Entry {
                depth: Some(depth), ..
            }) => *depth > 0,
            Some(_) => self.entries.len() > 1,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_api::{MatchedRecord, Query};

    fn entry(path: &str, seq: u64) -> Entry {
        Entry {
            route: Route::new(path, Query::new(), "", vec![MatchedRecord::new(path)]),
            seq: Seq::from_raw(seq),
            depth: None,
        }
    }

    fn paths(stack: &Stack) -> Vec<&str> {
        stack.entries().iter().map(|e| e.route.path.as_str()).collect()
    }

    #[test]
    fn pushes_append() {
        let mut stack = Stack::new();
        for (i, p) in ["/a", "/b", "/c"].iter().enumerate() {
            let r = stack.reconcile(entry(p, i as u64 + 1), NavIntent::Push);
            assert_eq!(r, Reconciled::default());
        }
        assert_eq!(paths(&stack), ["/a", "/b", "/c"]);
    }

    #[test]
    fn older_token_truncates() {
        let mut stack = Stack::new();
        for (i, p) in ["/a", "/b", "/c", "/d"].iter().enumerate() {
            stack.reconcile(entry(p, i as u64 + 1), NavIntent::Push);
        }
        let r = stack.reconcile(entry("/b", 2), NavIntent::Push);
        assert_eq!(r.truncated, 3);
        assert!(!r.popped);
        assert_eq!(paths(&stack), ["/a", "/b"]);
    }

    #[test]
    fn replace_pops_when_nothing_was_truncated() {
        let mut stack = Stack::new();
        stack.reconcile(entry("/a", 1), NavIntent::Push);
        stack.reconcile(entry("/b", 2), NavIntent::Push);

        let r = stack.reconcile(entry("/c", 3), NavIntent::Replace);
        assert_eq!(r, Reconciled { truncated: 0, popped: true });
        assert_eq!(paths(&stack), ["/a", "/c"]);
    }

    #[test]
    fn replace_with_reused_token_consumes_exactly_one_entry() {
        let mut stack = Stack::new();
        stack.reconcile(entry("/a", 1), NavIntent::Push);
        stack.reconcile(entry("/b", 2), NavIntent::Push);

        let r = stack.reconcile(entry("/c", 2), NavIntent::Replace);
        assert_eq!(r.dropped(), 1);
        assert_eq!(paths(&stack), ["/a", "/c"]);
    }

    #[test]
    fn replace_on_empty_stack_just_appends() {
        let mut stack = Stack::new();
        let r = stack.reconcile(entry("/a", 1), NavIntent::Replace);
        assert_eq!(r.dropped(), 0);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn can_go_back_prefers_depth() {
        let mut stack = Stack::new();
        assert!(!stack.can_go_back());

        stack.reconcile(entry("/a", 1), NavIntent::Push);
        assert!(!stack.can_go_back());
        stack.reconcile(entry("/b", 2), NavIntent::Push);
        assert!(stack.can_go_back());

        let mut resumed = Stack::new();
        let mut e = entry("/deep", 9);
        e.depth = Some(4);
        resumed.reconcile(e, NavIntent::Push);
        assert!(resumed.can_go_back());
    }
}
