//! Records, values and columns

mod column;
mod record;
mod record_serde;
mod row;
mod value;

pub use column::*;
pub use record::*;
pub use row::*;
pub use value::*;
