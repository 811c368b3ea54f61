// Location state store (debounced history writes)
//
// Edits update the in-memory state immediately and arm a debounce timer;
// the location only sees the state once the timer fires. Navigation
// replaces the in-memory state synchronously and disarms the timer.

use std::time::{Duration, Instant};

use mannsum_core::PersistedState;
use mannsum_engine::{codec, Tally};

use crate::debounce::Debouncer;
use crate::history::{Location, MemoryHistory};
use crate::query;

/// Default window for coalescing location writes
pub const DEFAULT_PERSIST_DEBOUNCE: Duration = Duration::from_millis(500);

/// Whether the location lags behind the in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Location reflects the last committed state
    Idle,
    /// In-memory state changed; a write is scheduled
    Dirty,
}

/// Owns the persisted state and its mirror in the location.
#[derive(Debug)]
pub struct LocationStateStore<L: Location> {
    location: L,
    /// Current in-memory state (what the view derives from)
    state: PersistedState,
    /// State last written to the location
    committed: PersistedState,
    persist: Debouncer,
    /// Number of history entries pushed by this store
    writes: usize,
}

impl<L: Location> LocationStateStore<L> {
    /// Wrap `location`. Call [`load_initial`](Self::load_initial) before use.
    pub fn new(location: L) -> Self {
        Self::with_debounce(location, DEFAULT_PERSIST_DEBOUNCE)
    }

    pub fn with_debounce(location: L, debounce: Duration) -> Self {
        Self {
            location,
            state: PersistedState::with_text(""),
            committed: PersistedState::with_text(""),
            persist: Debouncer::new(debounce),
            writes: 0,
        }
    }

    /// Read the location's query string, default `text` to `""`, and write
    /// the normalized state back as a replace so the first history entry
    /// carries a payload.
    pub fn load_initial(&mut self) -> &PersistedState {
        let state = query::decode(&self.location.query()).normalized();
        let encoded = query::encode(&state);
        log::info!(
            "location: loaded {} param(s), text is {} byte(s)",
            state.len(),
            state.text().len()
        );

        self.location.replace_state(state.clone(), encoded);
        self.persist.cancel();
        self.committed = state.clone();
        self.state = state;
        &self.state
    }

    /// Apply an edit now; persist it after the debounce window.
    pub fn update(&mut self, display: &str) {
        self.update_at(display, Instant::now());
    }

    pub fn update_at(&mut self, display: &str, now: Instant) {
        self.state.set_text(codec::to_persisted(display));
        self.persist.schedule(now);
        log::debug!(
            "location: text updated ({} byte(s)), write due in {:?}",
            display.len(),
            self.persist.delay()
        );
    }

    /// Restore state for a back/forward step.
    ///
    /// `restored` is the history entry's payload; `None` means the entry was
    /// not written by this store, so the location's query string is decoded
    /// instead. Any pending write is dropped.
    pub fn on_navigate(&mut self, restored: Option<PersistedState>) {
        let state = match restored {
            Some(state) => state,
            None => query::decode(&self.location.query()),
        }
        .normalized();

        if self.persist.is_pending() {
            log::debug!("location: navigation cancelled a pending write");
        }
        self.persist.cancel();
        self.committed = state.clone();
        self.state = state;
    }

    /// Write to the location if the debounce window has elapsed.
    /// Returns true if a history entry was pushed.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.persist.fire_if_due(now) {
            return self.write();
        }
        false
    }

    /// Write immediately, skipping the remaining debounce window.
    pub fn flush(&mut self) -> bool {
        if !self.persist.is_pending() {
            return false;
        }
        self.persist.cancel();
        self.write()
    }

    /// Push the state as it is now, not as it was when the write was
    /// scheduled.
    fn write(&mut self) -> bool {
        if self.state == self.committed {
            log::debug!("location: state unchanged since last write, skipping");
            return false;
        }

        let encoded = query::encode(&self.state);
        log::debug!("location: push ?{}", encoded);
        self.location.push_state(self.state.clone(), encoded);
        self.committed = self.state.clone();
        self.writes += 1;
        true
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Working text in display form
    pub fn display_text(&self) -> String {
        codec::to_display(self.state.text())
    }

    /// Derived view for the current state
    pub fn tally(&self) -> Tally {
        Tally::from_persisted(self.state.text())
    }

    pub fn phase(&self) -> Phase {
        if self.persist.is_pending() {
            Phase::Dirty
        } else {
            Phase::Idle
        }
    }

    /// Time left until the pending write, if any
    pub fn next_write_in(&self, now: Instant) -> Option<Duration> {
        self.persist.remaining(now)
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    /// `?`-prefixed query string for the current in-memory state
    pub fn search(&self) -> String {
        query::to_search(&self.state)
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn into_location(self) -> L {
        self.location
    }
}

impl LocationStateStore<MemoryHistory> {
    /// Step back through history and restore that entry. Returns false at
    /// the oldest entry.
    pub fn back(&mut self) -> bool {
        match self.location.back() {
            Some(pop) => {
                self.on_navigate(pop.state);
                true
            }
            None => false,
        }
    }

    /// Step forward through history and restore that entry.
    pub fn forward(&mut self) -> bool {
        match self.location.forward() {
            Some(pop) => {
                self.on_navigate(pop.state);
                true
            }
            None => false,
        }
    }
}
