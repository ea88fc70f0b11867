//! Per-group and footer summaries.
//!
//! Columns with an explicit [`Aggregation`] get that statistic; number
//! columns without one get a sum. Values that do not coerce to a number are
//! skipped rather than reported.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::model::Aggregation;
use crate::model::Column;
use crate::model::ColumnSet;
use crate::model::ColumnType;
use crate::model::TableRow;

/// One computed statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Which statistic was computed.
    pub kind: Aggregation,
    /// The result. `None` for `min`/`max` when no member was numeric.
    pub value: Option<f64>,
}

impl Summary {
    /// Display label, e.g. `"Sum"`.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// The statistic a column asks for, if any.
pub fn aggregation_for<R>(column: &Column<R>) -> Option<Aggregation> {
    match (column.aggregation, column.kind) {
        (Some(kind), _) => Some(kind),
        (None, ColumnType::Number) => Some(Aggregation::Sum),
        (None, _) => None,
    }
}

/// Summaries for every aggregating column over a set of rows.
pub fn summarize<R: TableRow>(
    members: &[Arc<R>],
    columns: &ColumnSet<R>,
) -> BTreeMap<String, Summary> {
    columns
        .iter()
        .filter_map(|column| {
            let kind = aggregation_for(column)?;
            let summary = Summary {
                kind,
                value: aggregate(members, column, kind),
            };
            Some((column.field.clone(), summary))
        })
        .collect()
}

/// Computes one statistic for one column.
pub fn aggregate<R: TableRow>(
    members: &[Arc<R>],
    column: &Column<R>,
    kind: Aggregation,
) -> Option<f64> {
    let numbers = members
        .iter()
        .filter_map(|row| column.resolve(row.as_ref()).to_number());

    match kind {
        Aggregation::Count => Some(members.len() as f64),
        Aggregation::Sum => Some(numbers.sum()),
        Aggregation::Avg => {
            let (sum, count) = numbers.fold((0.0, 0usize), |(s, c), n| (s + n, c + 1));
            if count == 0 {
                Some(0.0)
            } else {
                Some(sum / count as f64)
            }
        }
        Aggregation::Min => numbers.reduce(f64::min),
        Aggregation::Max => numbers.reduce(f64::max),
    }
}
