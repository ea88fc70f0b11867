//! Sort keys and the multi-key comparator.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::ColumnSet;
use crate::model::TableRow;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// One sort key. A list of keys sorts by the first, breaking ties with the
/// next, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Compares two rows under a list of sort keys.
///
/// Null values sort last whatever the direction. Values that both coerce to
/// numbers compare numerically, anything else compares as lowercase text.
pub fn compare<R: TableRow>(a: &R, b: &R, keys: &[SortKey], columns: &ColumnSet<R>) -> Ordering {
    for key in keys {
        let left = columns.resolve(a, &key.field);
        let right = columns.resolve(b, &key.field);

        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => continue,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => key.direction.apply(compare_values(&left, &right)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Ascending comparison of two non-null values.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left.to_number(), right.to_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left
            .to_string()
            .to_lowercase()
            .cmp(&right.to_string().to_lowercase()),
    }
}

/// Returns the rows sorted by `keys`. Rows that tie on every key keep their
/// input order.
pub fn sort_rows<R: TableRow>(
    rows: Vec<Arc<R>>,
    keys: &[SortKey],
    columns: &ColumnSet<R>,
) -> Vec<Arc<R>> {
    if keys.is_empty() {
        return rows;
    }
    let mut rows = rows;
    // slice::sort_by is stable
    rows.sort_by(|a, b| compare(a.as_ref(), b.as_ref(), keys, columns));
    rows
}
