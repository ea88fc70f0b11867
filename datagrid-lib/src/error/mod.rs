//! Error types

mod config;
mod export;
mod grid;

pub use config::*;
pub use export::*;
pub use grid::*;
