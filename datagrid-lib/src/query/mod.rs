//! Filtering and sorting of records.

mod filter;
mod order;

pub use filter::*;
pub use order::*;
