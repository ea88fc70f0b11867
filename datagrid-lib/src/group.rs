//! Grouping engine.
//!
//! Turns a filtered, sorted row list into the flat display sequence of group
//! headers and data rows. Groups appear in first-seen order, children follow
//! their header directly, and collapsed branches are pruned rather than
//! hidden, so the output only ever holds reachable rows.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::Summary;
use crate::aggregate::summarize;
use crate::model::ColumnSet;
use crate::model::TableRow;

/// Label for rows whose group field is missing, null or empty.
pub const UNGROUPED: &str = "Ungrouped";

/// Separator between levels of a group key.
pub const KEY_SEPARATOR: char = '|';

/// A data row in the display sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow<R> {
    /// The source record.
    pub record: Arc<R>,
    /// Indentation depth. `0` when the table is not grouped.
    pub level: usize,
}

/// A synthetic group header in the display sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHeader {
    /// The group's value at its own level.
    pub group_value: String,
    /// Path-qualified identity, e.g. `"Eng|NewYork"`.
    pub group_key: String,
    /// Number of rows in this group's own partition.
    pub item_count: usize,
    /// Nesting depth, `0` for top-level groups.
    pub level: usize,
    /// The group-by field this header partitions on.
    pub field: String,
    /// Whether the group's children are shown.
    pub expanded: bool,
    /// Per-column summaries over the group's rows.
    pub summaries: BTreeMap<String, Summary>,
}

/// One entry of the display sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DisplayRow<R> {
    Data(DataRow<R>),
    Group(GroupHeader),
}

impl<R> DisplayRow<R> {
    /// The record behind a data row.
    pub fn record(&self) -> Option<&Arc<R>> {
        match self {
            DisplayRow::Data(row) => Some(&row.record),
            DisplayRow::Group(_) => None,
        }
    }

    /// The header behind a group row.
    pub fn header(&self) -> Option<&GroupHeader> {
        match self {
            DisplayRow::Data(_) => None,
            DisplayRow::Group(header) => Some(header),
        }
    }

    pub fn is_group_header(&self) -> bool {
        matches!(self, DisplayRow::Group(_))
    }

    /// Indentation depth of either kind of row.
    pub fn level(&self) -> usize {
        match self {
            DisplayRow::Data(row) => row.level,
            DisplayRow::Group(header) => header.level,
        }
    }
}

/// Builds the display sequence for `rows` grouped by `group_fields`.
///
/// Without group fields the rows come back unchanged as level-0 data rows.
pub fn flatten<R: TableRow>(
    rows: &[Arc<R>],
    group_fields: &[String],
    expanded: &HashSet<String>,
    columns: &ColumnSet<R>,
) -> Vec<DisplayRow<R>> {
    if group_fields.is_empty() {
        return rows
            .iter()
            .map(|record| {
                DisplayRow::Data(DataRow {
                    record: Arc::clone(record),
                    level: 0,
                })
            })
            .collect();
    }

    let mut out = Vec::new();
    let grouping = Grouping {
        fields: group_fields,
        expanded,
        columns,
    };
    grouping.emit(rows, 0, "", &mut out);
    out
}

/// Every group key reachable under `group_fields`, expanded or not, in
/// display order.
pub fn group_keys<R: TableRow>(
    rows: &[Arc<R>],
    group_fields: &[String],
    columns: &ColumnSet<R>,
) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(rows, group_fields, 0, "", columns, &mut keys);
    keys
}

fn collect_keys<R: TableRow>(
    rows: &[Arc<R>],
    fields: &[String],
    depth: usize,
    parent_key: &str,
    columns: &ColumnSet<R>,
    keys: &mut Vec<String>,
) {
    let Some(field) = fields.get(depth) else {
        return;
    };
    for (value, members) in partition(rows, field, columns) {
        let key = group_key(parent_key, &value);
        keys.push(key.clone());
        collect_keys(&members, fields, depth + 1, &key, columns, keys);
    }
}

/// Joins a parent key and a group value.
pub fn group_key(parent_key: &str, value: &str) -> String {
    if parent_key.is_empty() {
        value.to_string()
    } else {
        format!("{parent_key}{KEY_SEPARATOR}{value}")
    }
}

struct Grouping<'a, R> {
    fields: &'a [String],
    expanded: &'a HashSet<String>,
    columns: &'a ColumnSet<R>,
}

impl<R: TableRow> Grouping<'_, R> {
    fn emit(&self, rows: &[Arc<R>], depth: usize, parent_key: &str, out: &mut Vec<DisplayRow<R>>) {
        let field = &self.fields[depth];
        let last_depth = depth + 1 == self.fields.len();

        for (value, members) in partition(rows, field, self.columns) {
            let key = group_key(parent_key, &value);
            let expanded = self.expanded.contains(&key);

            out.push(DisplayRow::Group(GroupHeader {
                group_value: value,
                group_key: key.clone(),
                item_count: members.len(),
                level: depth,
                field: field.clone(),
                expanded,
                summaries: summarize(&members, self.columns),
            }));

            if !expanded {
                continue;
            }
            if last_depth {
                let level = self.fields.len() + 1;
                out.extend(
                    members
                        .into_iter()
                        .map(|record| DisplayRow::Data(DataRow { record, level })),
                );
            } else {
                self.emit(&members, depth + 1, &key, out);
            }
        }
    }
}

/// Splits rows by the text value of `field`, keeping first-seen order of
/// groups and input order within each group.
fn partition<R: TableRow>(
    rows: &[Arc<R>],
    field: &str,
    columns: &ColumnSet<R>,
) -> Vec<(String, Vec<Arc<R>>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Arc<R>>)> = Vec::new();

    for row in rows {
        let value = columns.resolve(row.as_ref(), field);
        let label = if value.is_blank() {
            UNGROUPED.to_string()
        } else {
            value.to_string()
        };
        match index.get(&label) {
            Some(&i) => groups[i].1.push(Arc::clone(row)),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, vec![Arc::clone(row)]));
            }
        }
    }
    groups
}
