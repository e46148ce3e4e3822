use router_api::{HistoryState, HostHistory};

#[derive(Clone, Debug, PartialEq)]
pub struct HostEntry {
    pub url: String,
    pub title: String,
    pub state: Option<HistoryState>,
}

/// Session history of a single tab.
///
/// Traversals (`go`, and the `user_*` methods that stand in for browser
/// chrome) move the cursor immediately and queue one `popstate` each; the
/// owner drains them with [`MemoryHistory::take_popstate`].
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    entries: Vec<HostEntry>,
    index: usize,
    popstates: usize,
}

impl MemoryHistory {
    pub fn new(url: &str) -> Self {
        Self {
            entries: vec![HostEntry {
                url: url.to_string(),
                title: String::new(),
                state: None,
            }],
            index: 0,
            popstates: 0,
        }
    }

    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    /// Entries up to and including the current one.
    pub fn reachable(&self) -> &[HostEntry] {
        &self.entries[..=self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &HostEntry {
        &self.entries[self.index]
    }

    pub fn pending_popstates(&self) -> usize {
        self.popstates
    }

    /// Consume one queued `popstate` notification.
    pub fn take_popstate(&mut self) -> bool {
        if self.popstates == 0 {
            return false;
        }
        self.popstates -= 1;
        true
    }

    /// Browser back button.
    pub fn user_back(&mut self) -> bool {
        self.traverse(-1)
    }

    /// Browser forward button.
    pub fn user_forward(&mut self) -> bool {
        self.traverse(1)
    }

    /// Long-press on back/forward: jump several entries at once.
    pub fn user_go(&mut self, delta: i32) -> bool {
        self.traverse(delta)
    }

    /// The user edits the URL (fragment-style): the browser adds an entry
    /// with no persisted state and reports it as a traversal.
    pub fn user_enter_url(&mut self, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HostEntry {
            url: url.to_string(),
            title: String::new(),
            state: None,
        });
        self.index += 1;
        self.popstates += 1;
    }

    /// Drop the current entry's persisted state, as some hosts do.
    pub fn clear_state(&mut self) {
        self.entries[self.index].state = None;
    }

    fn traverse(&mut self, delta: i32) -> bool {
        let target = self.index as i64 + i64::from(delta);
        if delta == 0 || target < 0 || target >= self.entries.len() as i64 {
            log::trace!(target: "platform.history", "ignored go({delta}) at {}", self.index);
            return false;
        }
        self.index = target as usize;
        self.popstates += 1;
        true
    }
}

impl HostHistory for MemoryHistory {
    fn push_state(&mut self, state: HistoryState, title: &str, url: Option<&str>) {
        let url = url.unwrap_or(self.entries[self.index].url.as_str()).to_string();
        self.entries.truncate(self.index + 1);
        self.entries.push(HostEntry {
            url,
            title: title.to_string(),
            state: Some(state),
        });
        self.index += 1;
    }

    fn replace_state(&mut self, state: HistoryState, title: &str, url: Option<&str>) {
        let entry = &mut self.entries[self.index];
        if let Some(url) = url {
            entry.url = url.to_string();
        }
        entry.title = title.to_string();
        entry.state = Some(state);
    }

    fn go(&mut self, delta: i32) -> bool {
        self.traverse(delta)
    }

    fn state(&self) -> Option<&HistoryState> {
        self.entries[self.index].state.as_ref()
    }

    fn location(&self) -> &str {
        &self.entries[self.index].url
    }
}
