//! Serializable snapshot of a table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::Summary;
use crate::group::DisplayRow;
use crate::model::ColumnZones;
use crate::model::TableRow;
use crate::page::PageInfo;
use crate::query::FilterCondition;
use crate::query::SortKey;
use crate::window::Window;

/// Whether there is anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewState {
    /// No record survives filtering (or there are no records).
    Empty,
    /// At least one record is shown.
    Ready,
}

/// How the body is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PresentationMode {
    /// One page at a time.
    Paged,
    /// A scroll window over the whole sequence.
    Virtual,
}

/// What a table currently shows, borrowed from its controller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = "R: Serialize"))]
pub struct TableView<'a, R: TableRow> {
    pub state: ViewState,
    pub mode: PresentationMode,
    /// Index of `rows[0]` in the full display sequence.
    pub first_index: usize,
    /// Rows of the current page or scroll window.
    pub rows: &'a [DisplayRow<R>],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<Window>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
    pub columns: ColumnZones<'a, R>,
    pub filters: &'a [FilterCondition],
    pub sorts: &'a [SortKey],
    pub group_by: &'a [String],
    pub total_records: usize,
    pub filtered_records: usize,
    pub selected_count: usize,
    pub all_selected: bool,
    /// Whole-table summaries, when the sticky footer is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<BTreeMap<String, Summary>>,
}
