//! Projection of the global stack onto one nested view's sub-stack.

use crate::stack::Entry;
use core_types::InstanceId;
use router_api::{DEFAULT_OUTLET, MatchedRecord, ViewTree, ancestors};

/// A stack entry seen from inside a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopedEntry<'a> {
    pub entry: &'a Entry,
    /// Record one level below the scope root.
    pub record: &'a MatchedRecord,
    /// Default-outlet view of `record`.
    pub component: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeRoot<'a> {
    pub record: &'a MatchedRecord,
    /// Position of `record` in the matched chain.
    pub index: usize,
}

/// Closest ancestor of `instance` (itself included) that is mounted as the
/// default view of some record on the stack. Recent entries win ties.
pub fn find_scope_root<'a, T: ViewTree + ?Sized>(
    entries: &'a [Entry],
    instance: InstanceId,
    tree: &T,
) -> Option<ScopeRoot<'a>> {
    ancestors(tree, instance).find_map(|ancestor| {
        entries.iter().rev().find_map(|entry| {
            entry
                .route
                .matched
                .iter()
                .enumerate()
                .find(|(_, record)| tree.mounted(record, DEFAULT_OUTLET) == Some(ancestor))
                .map(|(index, record)| ScopeRoot { record, index })
        })
    })
}

/// The current visit to `root`: the newest contiguous run of entries that
/// pass through `root` and render something below it, oldest first.
///
/// Contiguity matters: after leaving the scope and coming back, the visits
/// before the excursion are not part of the live sub-stack.
pub fn project<'a>(entries: &'a [Entry], root: ScopeRoot<'_>) -> Vec<ScopedEntry<'a>> {
    let mut out: Vec<ScopedEntry<'a>> = entries
        .iter()
        .rev()
        .map_while(|entry| {
            let matched = &entry.route.matched;
            if !matched.get(root.index)?.is_same(root.record) {
                return None;
            }
            let record = matched.get(root.index + 1)?;
            Some(ScopedEntry {
                entry,
                record,
                component: record.default_component(),
            })
        })
        .collect();
    out.reverse();
    out
}

/// Scoped sub-stack for `instance`; empty when it is not inside any routed
/// region.
pub fn scoped<'a, T: ViewTree + ?Sized>(
    entries: &'a [Entry],
    instance: InstanceId,
    tree: &T,
) -> Vec<ScopedEntry<'a>> {
    match find_scope_root(entries, instance, tree) {
        Some(root) => project(entries, root),
        None => Vec::new(),
    }
}
