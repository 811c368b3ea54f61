//! `mannsum-location`: keeps the working text in sync with a navigable
//! location (query string plus session history).
//!
//! The location itself is behind the [`Location`] trait; [`MemoryHistory`]
//! models a browser's session history for the terminal editor and tests.

pub mod debounce;
pub mod history;
pub mod query;
pub mod store;

pub use debounce::Debouncer;
pub use history::{HistoryEntry, Location, MemoryHistory, PopState};
pub use store::{LocationStateStore, Phase};
