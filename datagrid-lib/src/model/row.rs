//! Row abstraction the pipeline is generic over.

use std::fmt;

use serde::Serialize;

use super::Value;

/// Identity of a row for selection purposes.
///
/// Rows with an explicit id compare by it; rows without one compare by their
/// full contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RowKey {
    /// Canonical JSON of the row's `id` value.
    Id(String),
    /// Canonical JSON of every field, sorted by name.
    Structural(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => write!(f, "id:{}", id),
            RowKey::Structural(s) => write!(f, "row:{}", s),
        }
    }
}

/// Trait for rows that can be fed through the grid pipeline.
///
/// [`Record`](super::Record) implements it for dynamic data; hosts with a
/// fixed schema can implement it for their own structs.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{RowKey, TableRow, Value};
///
/// #[derive(Debug, Clone)]
/// struct Employee {
///     id: u32,
///     name: Value,
/// }
///
/// impl TableRow for Employee {
///     fn field(&self, name: &str) -> Option<&Value> {
///         match name {
///             "name" => Some(&self.name),
///             _ => None,
///         }
///     }
///
///     fn key(&self) -> RowKey {
///         RowKey::Id(self.id.to_string())
///     }
/// }
/// ```
pub trait TableRow: Clone + fmt::Debug + Send + Sync + 'static {
    /// Direct lookup of a field. `None` means the field is absent.
    fn field(&self, name: &str) -> Option<&Value>;

    /// Return the identity of this row.
    fn key(&self) -> RowKey;
}
