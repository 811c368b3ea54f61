pub mod aggregate;
pub mod codec;
pub mod format;
pub mod lines;
pub mod tally;

pub use aggregate::{decompose, sum, MANN};
pub use tally::Tally;
