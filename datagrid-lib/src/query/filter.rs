//! Filter conditions and the predicate evaluator.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Column;
use crate::model::ColumnSet;
use crate::model::ColumnType;
use crate::model::TableRow;
use crate::model::Value;
use crate::model::lookup;

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Case-insensitive substring.
    Contains,
    /// Strict equality for booleans and selects, text equality otherwise.
    Equals,
    /// Case-insensitive prefix.
    StartsWith,
    /// Case-insensitive suffix.
    EndsWith,
    Gt,
    Lt,
    Gte,
    Lte,
    /// Membership in a set of allowed values.
    In,
}

/// Payload of a filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Set of allowed values, for `in`.
    List(Vec<Value>),
    /// Bounded range, for `gte` and `lte`.
    Range {
        #[serde(default)]
        min: Option<Value>,
        #[serde(default)]
        max: Option<Value>,
    },
    /// A single operand.
    Scalar(Value),
}

impl FilterValue {
    /// Text form of the operand, for the string operators.
    fn as_text(&self) -> Option<String> {
        match self {
            FilterValue::Scalar(v) => Some(v.to_string()),
            FilterValue::List(items) => Some(Value::List(items.clone()).to_string()),
            FilterValue::Range { .. } => None,
        }
    }

    /// Numeric form of the operand, for the relational operators.
    fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Scalar(v) => v.to_number(),
            FilterValue::List(items) => match items.as_slice() {
                [single] => single.to_number(),
                _ => None,
            },
            FilterValue::Range { .. } => None,
        }
    }
}

impl From<Value> for FilterValue {
    fn from(v: Value) -> Self {
        FilterValue::Scalar(v)
    }
}

/// A filter on one field.
///
/// A table holds at most one active filter per field.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::FilterCondition;
///
/// let eng = FilterCondition::equals("dept", "Eng");
/// let senior = FilterCondition::range("salary", Some(100_000), None::<i32>);
/// let offices = FilterCondition::any_of("office", ["NYC", "SF"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
}

impl FilterCondition {
    /// Creates a filter with an explicit operator.
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            kind: ColumnType::Text,
        }
    }

    /// Sets the column type the filter was built for.
    pub fn with_kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Contains, FilterValue::Scalar(value.into()))
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, FilterValue::Scalar(value.into()))
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::StartsWith, FilterValue::Scalar(value.into()))
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::EndsWith, FilterValue::Scalar(value.into()))
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Gt, FilterValue::Scalar(value.into()))
            .with_kind(ColumnType::Number)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Lt, FilterValue::Scalar(value.into()))
            .with_kind(ColumnType::Number)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Gte, FilterValue::Scalar(value.into()))
            .with_kind(ColumnType::Number)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Lte, FilterValue::Scalar(value.into()))
            .with_kind(ColumnType::Number)
    }

    /// A `gte` filter with a `{min, max}` payload: `min <= v` and, when set,
    /// `v <= max`.
    pub fn range(
        field: impl Into<String>,
        min: Option<impl Into<Value>>,
        max: Option<impl Into<Value>>,
    ) -> Self {
        let value = FilterValue::Range {
            min: min.map(Into::into),
            max: max.map(Into::into),
        };
        Self::new(field, FilterOperator::Gte, value).with_kind(ColumnType::Number)
    }

    /// An `in` filter over a set of allowed values.
    pub fn any_of<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(field, FilterOperator::In, FilterValue::List(values))
            .with_kind(ColumnType::Select)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Tests one row against one filter.
///
/// The value is resolved through the column when it is known, by direct
/// lookup otherwise. A null or missing value never matches.
pub fn matches<R: TableRow>(row: &R, filter: &FilterCondition, column: Option<&Column<R>>) -> bool {
    let value = match column {
        Some(column) => column.resolve(row),
        None => lookup(row, &filter.field),
    };
    if value.is_null() {
        return false;
    }
    evaluate(&value, filter)
}

/// Tests one row against every filter (logical AND).
pub fn matches_all<R: TableRow>(
    row: &R,
    filters: &[FilterCondition],
    columns: &ColumnSet<R>,
) -> bool {
    filters
        .iter()
        .all(|filter| matches(row, filter, columns.get(&filter.field)))
}

/// Returns the rows passing every filter, in their original order.
pub fn filter_rows<R: TableRow>(
    rows: &[Arc<R>],
    filters: &[FilterCondition],
    columns: &ColumnSet<R>,
) -> Vec<Arc<R>> {
    if filters.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| matches_all(row.as_ref(), filters, columns))
        .cloned()
        .collect()
}

fn evaluate(value: &Value, filter: &FilterCondition) -> bool {
    match filter.operator {
        FilterOperator::Contains => text_test(value, &filter.value, |v, f| v.contains(f)),
        FilterOperator::StartsWith => text_test(value, &filter.value, |v, f| v.starts_with(f)),
        FilterOperator::EndsWith => text_test(value, &filter.value, |v, f| v.ends_with(f)),
        FilterOperator::Equals => equals(value, filter),
        FilterOperator::Gt => relational(value, &filter.value, |v, f| v > f),
        FilterOperator::Lt => relational(value, &filter.value, |v, f| v < f),
        FilterOperator::Gte => match &filter.value {
            FilterValue::Range { min, max } => in_range(value, min.as_ref(), max.as_ref(), true),
            operand => relational(value, operand, |v, f| v >= f),
        },
        FilterOperator::Lte => match &filter.value {
            FilterValue::Range { min, max } => in_range(value, min.as_ref(), max.as_ref(), false),
            operand => relational(value, operand, |v, f| v <= f),
        },
        FilterOperator::In => {
            let text = value.to_string();
            match &filter.value {
                FilterValue::List(allowed) => allowed.iter().any(|a| a.to_string() == text),
                FilterValue::Scalar(single) => single.to_string() == text,
                FilterValue::Range { .. } => false,
            }
        }
    }
}

fn text_test(value: &Value, operand: &FilterValue, test: impl Fn(&str, &str) -> bool) -> bool {
    match operand.as_text() {
        Some(needle) => test(&value.to_string().to_lowercase(), &needle.to_lowercase()),
        None => false,
    }
}

fn equals(value: &Value, filter: &FilterCondition) -> bool {
    let FilterValue::Scalar(operand) = &filter.value else {
        return false;
    };
    match filter.kind {
        ColumnType::Boolean | ColumnType::Select => value.strict_eq(operand),
        _ => value.to_string() == operand.to_string(),
    }
}

fn relational(value: &Value, operand: &FilterValue, test: impl Fn(f64, f64) -> bool) -> bool {
    match (value.to_number(), operand.as_number()) {
        (Some(v), Some(f)) => test(v, f),
        _ => false,
    }
}

/// Range payload of `gte` and `lte`.
///
/// `gte` requires the lower bound and treats the upper bound as optional;
/// `lte` is the mirror image.
fn in_range(value: &Value, min: Option<&Value>, max: Option<&Value>, lower_required: bool) -> bool {
    let Some(v) = value.to_number() else {
        return false;
    };
    let min = min.filter(|m| !m.is_null()).map(Value::to_number);
    let max = max.filter(|m| !m.is_null()).map(Value::to_number);
    let (required, optional) = if lower_required { (min, max) } else { (max, min) };

    let required_ok = match required {
        Some(Some(bound)) => {
            if lower_required {
                v >= bound
            } else {
                v <= bound
            }
        }
        _ => false,
    };
    let optional_ok = match optional {
        None => true,
        Some(Some(bound)) => {
            if lower_required {
                v <= bound
            } else {
                v >= bound
            }
        }
        Some(None) => false,
    };
    required_ok && optional_ok
}

/// Distinct non-null text values of a column, sorted.
///
/// Feeds the choices of select and `in` filters.
pub fn unique_values<R: TableRow>(rows: &[Arc<R>], column: &Column<R>) -> Vec<String> {
    rows.iter()
        .map(|row| column.resolve(row.as_ref()))
        .filter(|value| !value.is_null())
        .map(|value| value.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
