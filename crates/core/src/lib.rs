pub mod line;
pub mod state;
pub mod total;

pub use line::{LineValue, ParsedLine};
pub use state::PersistedState;
pub use total::{AggregateResult, Sign};
