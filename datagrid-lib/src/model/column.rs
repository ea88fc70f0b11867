//! Column definitions and the column set.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::TableRow;
use super::Value;
use crate::error::ConfigError;

/// Computes a cell value from a whole row.
pub type ValueGetter<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Pin position of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pin {
    /// Fixed to the left edge.
    Left,
    /// Fixed to the right edge.
    Right,
    /// Scrolls horizontally with the body.
    #[default]
    None,
}

/// Data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Select,
    Boolean,
}

/// Summary statistic computed for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    /// Number of rows.
    Count,
    /// Sum of numeric values.
    Sum,
    /// Mean of numeric values.
    Avg,
    /// Minimum numeric value.
    Min,
    /// Maximum numeric value.
    Max,
}

impl Aggregation {
    /// Short label shown next to a summary.
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Count => "Count",
            Aggregation::Sum => "Sum",
            Aggregation::Avg => "Avg",
            Aggregation::Min => "Min",
            Aggregation::Max => "Max",
        }
    }
}

/// A grid column definition.
///
/// `field` is the column's unique key. When a value getter is set it
/// replaces direct field lookup everywhere the column is consulted: sorting,
/// filtering, grouping, aggregation and export.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Column<R> {
    /// Field name, unique within a column set.
    pub field: String,
    /// Header text.
    pub header: String,
    pub sortable: bool,
    pub filterable: bool,
    pub groupable: bool,
    pub editable: bool,
    pub hidden: bool,
    pub pinned: Pin,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    /// Choices for select columns.
    pub options: Vec<String>,
    pub aggregation: Option<Aggregation>,
    #[serde(skip)]
    value_getter: Option<ValueGetter<R>>,
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("header", &self.header)
            .field("kind", &self.kind)
            .field("pinned", &self.pinned)
            .field("hidden", &self.hidden)
            .field("aggregation", &self.aggregation)
            .field("value_getter", &self.value_getter.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: TableRow> Column<R> {
    /// Create a new text column with the given field and header.
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            sortable: true,
            filterable: true,
            groupable: true,
            editable: false,
            hidden: false,
            pinned: Pin::None,
            kind: ColumnType::Text,
            width: None,
            min_width: None,
            max_width: None,
            options: Vec::new(),
            aggregation: None,
            value_getter: None,
        }
    }

    /// Set the column type.
    pub fn kind(mut self, kind: ColumnType) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for a number column.
    pub fn number(self) -> Self {
        self.kind(ColumnType::Number)
    }

    /// Pin the column.
    pub fn pinned(mut self, pin: Pin) -> Self {
        self.pinned = pin;
        self
    }

    /// Hide the column.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Allow inline editing.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn groupable(mut self, groupable: bool) -> Self {
        self.groupable = groupable;
        self
    }

    /// Set width bounds. The current width is clamped into them.
    pub fn width_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self.width = self.width.map(|w| self.clamp_width(w));
        self
    }

    /// Set a width in pixels, clamped to the column's bounds.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(self.clamp_width(width));
        self
    }

    /// Set the select choices.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Request a summary statistic for this column.
    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Compute cell values with a getter instead of direct lookup.
    pub fn with_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.value_getter = Some(Arc::new(getter));
        self
    }

    /// Returns `true` when a value getter is installed.
    pub fn has_getter(&self) -> bool {
        self.value_getter.is_some()
    }

    /// Resolves this column's value for a row.
    ///
    /// Missing fields resolve to [`Value::Null`].
    pub fn resolve<'a>(&self, row: &'a R) -> Cow<'a, Value> {
        match &self.value_getter {
            Some(getter) => Cow::Owned(getter(row)),
            None => lookup(row, &self.field),
        }
    }

    fn clamp_width(&self, width: u32) -> u32 {
        let width = self.min_width.map_or(width, |min| width.max(min));
        self.max_width.map_or(width, |max| width.min(max))
    }
}

/// Direct field lookup; missing fields resolve to null.
pub fn lookup<'a, R: TableRow>(row: &'a R, field: &str) -> Cow<'a, Value> {
    row.field(field)
        .map(Cow::Borrowed)
        .unwrap_or(Cow::Owned(Value::Null))
}

/// Visible columns split into render zones.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct ColumnZones<'a, R> {
    /// Left-pinned columns.
    pub left: Vec<&'a Column<R>>,
    /// Unpinned, horizontally scrollable columns.
    pub center: Vec<&'a Column<R>>,
    /// Right-pinned columns.
    pub right: Vec<&'a Column<R>>,
}

impl<R> ColumnZones<'_, R> {
    /// Total number of visible columns.
    pub fn len(&self) -> usize {
        self.left.len() + self.center.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the zones in render order: left, center, right.
    pub fn iter(&self) -> impl Iterator<Item = &Column<R>> + '_ {
        self.left
            .iter()
            .chain(self.center.iter())
            .chain(self.right.iter())
            .copied()
    }
}

/// An ordered list of columns with unique fields.
#[derive(Debug, Clone)]
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
}

impl<R> Default for ColumnSet<R> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<R: TableRow> ColumnSet<R> {
    /// Creates a column set, rejecting empty or duplicate fields.
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.field.is_empty() {
                return Err(ConfigError::EmptyField);
            }
            if !seen.insert(column.field.as_str()) {
                return Err(ConfigError::duplicate_column(&column.field));
            }
        }
        Ok(Self { columns })
    }

    /// Get a column by field.
    pub fn get(&self, field: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.field == field)
    }

    fn get_mut(&mut self, field: &str) -> Result<&mut Column<R>, ConfigError> {
        self.columns
            .iter_mut()
            .find(|c| c.field == field)
            .ok_or_else(|| ConfigError::unknown_column(field))
    }

    /// Resolves a field for a row, through its column when one is defined.
    pub fn resolve<'a>(&self, row: &'a R, field: &str) -> Cow<'a, Value> {
        match self.get(field) {
            Some(column) => column.resolve(row),
            None => lookup(row, field),
        }
    }

    /// All columns in definition order.
    pub fn iter(&self) -> std::slice::Iter<'_, Column<R>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns that are not hidden, in definition order.
    pub fn visible(&self) -> Vec<&Column<R>> {
        self.columns.iter().filter(|c| !c.hidden).collect()
    }

    /// Partitions visible columns into left, center and right zones.
    pub fn zones(&self) -> ColumnZones<'_, R> {
        let mut zones = ColumnZones {
            left: Vec::new(),
            center: Vec::new(),
            right: Vec::new(),
        };
        for column in self.columns.iter().filter(|c| !c.hidden) {
            match column.pinned {
                Pin::Left => zones.left.push(column),
                Pin::None => zones.center.push(column),
                Pin::Right => zones.right.push(column),
            }
        }
        zones
    }

    /// Show or hide a column.
    pub fn set_hidden(&mut self, field: &str, hidden: bool) -> Result<(), ConfigError> {
        self.get_mut(field)?.hidden = hidden;
        Ok(())
    }

    /// Pin or unpin a column.
    pub fn set_pinned(&mut self, field: &str, pin: Pin) -> Result<(), ConfigError> {
        self.get_mut(field)?.pinned = pin;
        Ok(())
    }

    /// Resize a column. Returns the width after clamping.
    pub fn set_width(&mut self, field: &str, width: u32) -> Result<u32, ConfigError> {
        let column = self.get_mut(field)?;
        let clamped = column.clamp_width(width);
        column.width = Some(clamped);
        Ok(clamped)
    }

    /// Move the column at `from` so it ends up at index `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), ConfigError> {
        let len = self.columns.len();
        if from >= len || to >= len {
            return Err(ConfigError::IndexOutOfRange {
                index: from.max(to),
                len,
            });
        }
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        Ok(())
    }
}

impl<R> IntoIterator for ColumnSet<R> {
    type Item = Column<R>;
    type IntoIter = std::vec::IntoIter<Column<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
