//! Collaborator traits.
//!
//! The table never edits, exports or reports selection itself; it hands
//! those jobs to host-provided collaborators. Closures implement
//! [`CellEditor`] and [`SelectionListener`] directly.

use std::sync::Arc;

use crate::error::ExportError;
use crate::model::Column;
use crate::model::Value;

/// Receives committed inline edits.
///
/// The table keeps showing the old value until the host replaces its data.
pub trait CellEditor<R> {
    fn edit(&mut self, record: &R, field: &str, value: Value);
}

impl<R, F> CellEditor<R> for F
where
    F: FnMut(&R, &str, Value),
{
    fn edit(&mut self, record: &R, field: &str, value: Value) {
        self(record, field, value)
    }
}

/// Writes the filtered, sorted rows in some format.
pub trait Exporter<R> {
    /// Export `rows` using the visible `columns`, in display order.
    fn export(&mut self, rows: &[Arc<R>], columns: &[&Column<R>]) -> Result<(), ExportError>;
}

/// Notified with the selected rows after every selection change.
pub trait SelectionListener<R>: Send {
    fn selection_changed(&mut self, selected: &[Arc<R>]);
}

impl<R, F> SelectionListener<R> for F
where
    F: FnMut(&[Arc<R>]) + Send,
{
    fn selection_changed(&mut self, selected: &[Arc<R>]) {
        self(selected)
    }
}
