use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque per-entry blob persisted by the host history.
///
/// Routers store their own fields here; the navigation stack adds its own
/// alongside without touching the rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryState(Map<String, Value>);

impl HistoryState {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}

/// Browser-style session history.
///
/// `go` is asynchronous on real hosts: the move is reported later through a
/// `popstate` notification that the host delivers to whoever owns it.
pub trait HostHistory {
    fn push_state(&mut self, state: HistoryState, title: &str, url: Option<&str>);
    fn replace_state(&mut self, state: HistoryState, title: &str, url: Option<&str>);
    /// Returns `false` when the host ignores the move (zero or out of
    /// range); no `popstate` follows then.
    fn go(&mut self, delta: i32) -> bool;
    /// State persisted for the current entry, if the entry has any.
    fn state(&self) -> Option<&HistoryState>;
    /// Path-relative URL of the current entry.
    fn location(&self) -> &str;
}
