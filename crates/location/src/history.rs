//! Session history for persisted state

use mannsum_core::PersistedState;

/// Where the working state is mirrored: a query string plus a session
/// history whose entries carry the full state as their payload.
pub trait Location {
    /// Current query string, without the leading `?`
    fn query(&self) -> String;

    /// Add a new history entry and make it current.
    fn push_state(&mut self, state: PersistedState, query: String);

    /// Overwrite the current history entry in place.
    fn replace_state(&mut self, state: PersistedState, query: String);
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// `None` for entries that were not written through `push_state` /
    /// `replace_state` (e.g. the page was opened from a typed URL)
    pub state: Option<PersistedState>,
    pub query: String,
}

/// Delivered to the store after a back/forward step.
#[derive(Clone, Debug, PartialEq)]
pub struct PopState {
    pub state: Option<PersistedState>,
}

/// In-memory session history with a cursor, like a browser tab's.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    max_entries: usize,
}

impl MemoryHistory {
    /// Start with a single externally created entry for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                state: None,
                query: query.into(),
            }],
            cursor: 0,
            max_entries: 100,
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 0-based position of the current entry
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry, returning its payload
    pub fn back(&mut self) -> Option<PopState> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.pop_state())
    }

    /// Step forward one entry, returning its payload
    pub fn forward(&mut self) -> Option<PopState> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.pop_state())
    }

    fn pop_state(&self) -> PopState {
        PopState {
            state: self.current().state.clone(),
        }
    }
}

impl Location for MemoryHistory {
    fn query(&self) -> String {
        self.current().query.clone()
    }

    fn push_state(&mut self, state: PersistedState, query: String) {
        // Pushing from the middle of history discards the forward entries
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            state: Some(state),
            query,
        });

        // Limit history size
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    fn replace_state(&mut self, state: PersistedState, query: String) {
        self.entries[self.cursor] = HistoryEntry {
            state: Some(state),
            query,
        };
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}
