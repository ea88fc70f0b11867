//! Data grid engine
//!
//! Turns records and column definitions into the rows a grid shows: filtered,
//! sorted, grouped into collapsible levels with per-group summaries, then
//! paginated or windowed for virtual scrolling. Selection, expansion and
//! column layout survive every recompute.

pub mod aggregate;
pub mod collab;
pub mod config;
pub mod error;
pub mod group;
pub mod model;
pub mod page;
pub mod query;
pub mod selection;
pub mod state;
pub mod window;

pub use config::TableConfig;
pub use error::Error;
pub use error::Result;
pub use state::TableController;
