//! Table state controller.
//!
//! [`TableController`] owns the interactive state of one table (filters,
//! sorts, grouping, expansion, selection, paging and scrolling) and keeps
//! the derived row sequences current. Every mutation recomputes what it
//! invalidated before returning, so reads never observe stale rows.
//!
//! The pipeline runs in two cached stages:
//!
//! ```text
//! data ─filter─▶ ─sort─▶ processed ─group/flatten─▶ rows ─page|window─▶ visible
//! ```
//!
//! Changing data, columns, filters or sorts reruns both stages; changing the
//! group-by list or expansion reruns only the grouping stage. Paging and
//! scrolling never rerun either.

mod view;

pub use view::*;

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::aggregate::Summary;
use crate::aggregate::summarize;
use crate::collab::CellEditor;
use crate::collab::Exporter;
use crate::collab::SelectionListener;
use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::error::ExportError;
use crate::group::DisplayRow;
use crate::group::flatten;
use crate::group::group_keys;
use crate::model::Column;
use crate::model::ColumnSet;
use crate::model::Pin;
use crate::model::RowKey;
use crate::model::TableRow;
use crate::model::Value;
use crate::page::PageInfo;
use crate::page::Pagination;
use crate::query::Direction;
use crate::query::FilterCondition;
use crate::query::SortKey;
use crate::query::filter_rows;
use crate::query::sort_rows;
use crate::query::unique_values;
use crate::selection::Selection;
use crate::window::ScrollRequest;
use crate::window::Viewport;
use crate::window::Window;

/// Interactive state and derived rows of one table.
///
/// # Example
///
/// ```
/// use datagrid_lib::config::TableConfig;
/// use datagrid_lib::model::{Column, Record};
/// use datagrid_lib::query::FilterCondition;
/// use datagrid_lib::state::TableController;
///
/// let columns = vec![
///     Column::<Record>::new("name", "Name"),
///     Column::new("dept", "Department"),
/// ];
/// let mut table = TableController::new(columns, TableConfig::default()).unwrap();
/// table.set_data([
///     Record::new().set("name", "Ada").set("dept", "Eng"),
///     Record::new().set("name", "Bo").set("dept", "Sales"),
/// ]);
///
/// table.set_filter("dept", Some(FilterCondition::equals("dept", "Eng")));
/// assert_eq!(table.processed_rows().len(), 1);
/// ```
pub struct TableController<R: TableRow> {
    data: Vec<Arc<R>>,
    columns: ColumnSet<R>,
    config: TableConfig,

    filters: Vec<FilterCondition>,
    sorts: Vec<SortKey>,
    group_by: Vec<String>,
    expanded: HashSet<String>,
    selection: Selection,
    pagination: Pagination,
    viewport: Viewport,
    listener: Option<Box<dyn SelectionListener<R>>>,

    /// Filtered and sorted records.
    processed: Vec<Arc<R>>,
    /// Grouped display sequence built from `processed`.
    rows: Vec<DisplayRow<R>>,
}

impl<R: TableRow> fmt::Debug for TableController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("records", &self.data.len())
            .field("columns", &self.columns.len())
            .field("filters", &self.filters)
            .field("sorts", &self.sorts)
            .field("group_by", &self.group_by)
            .field("expanded", &self.expanded.len())
            .field("selected", &self.selection.len())
            .field("pagination", &self.pagination)
            .field("viewport", &self.viewport)
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: TableRow> TableController<R> {
    /// Creates an empty table over `columns`.
    pub fn new(columns: Vec<Column<R>>, config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let columns = ColumnSet::new(columns)?;
        Ok(Self {
            data: Vec::new(),
            columns,
            filters: Vec::new(),
            sorts: Vec::new(),
            group_by: Vec::new(),
            expanded: HashSet::new(),
            selection: Selection::new(config.selection_mode),
            pagination: Pagination::new(config.page_size)?,
            viewport: Viewport::new(config.row_height, config.container_height, config.overscan),
            listener: None,
            processed: Vec::new(),
            rows: Vec::new(),
            config,
        })
    }

    /// Builder form of [`set_data`](Self::set_data).
    pub fn with_data(mut self, records: impl IntoIterator<Item = R>) -> Self {
        self.set_data(records);
        self
    }

    /// Installs a listener notified after every selection change.
    pub fn with_selection_listener(
        mut self,
        listener: impl SelectionListener<R> + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    // =========================================================================
    // Data and columns
    // =========================================================================

    /// Replaces the records. Selection is kept by row key.
    pub fn set_data(&mut self, records: impl IntoIterator<Item = R>) {
        self.set_shared_data(records.into_iter().map(Arc::new).collect());
    }

    /// Replaces the records with already shared rows.
    pub fn set_shared_data(&mut self, records: Vec<Arc<R>>) {
        self.data = records;
        self.refresh_query();
    }

    /// All records, in source order.
    pub fn data(&self) -> &[Arc<R>] {
        &self.data
    }

    /// Replaces the column definitions wholesale.
    pub fn update_columns(&mut self, columns: Vec<Column<R>>) -> Result<(), ConfigError> {
        self.columns = ColumnSet::new(columns)?;
        self.refresh_query();
        Ok(())
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    /// Shows or hides a column.
    pub fn set_column_hidden(&mut self, field: &str, hidden: bool) -> Result<(), ConfigError> {
        self.columns.set_hidden(field, hidden)
    }

    /// Pins a column to the left or right zone, or unpins it.
    pub fn set_column_pinned(&mut self, field: &str, pin: Pin) -> Result<(), ConfigError> {
        self.columns.set_pinned(field, pin)
    }

    /// Resizes a column within its bounds and returns the applied width.
    pub fn set_column_width(&mut self, field: &str, width: u32) -> Result<u32, ConfigError> {
        self.columns.set_width(field, width)
    }

    /// Reorders a column.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), ConfigError> {
        self.columns.move_column(from, to)
    }

    /// Choices for a select or `in` filter on `field`: the column's declared
    /// options, else the distinct values present in the data.
    pub fn filter_choices(&self, field: &str) -> Vec<String> {
        match self.columns.get(field) {
            Some(column) if !column.options.is_empty() => column.options.clone(),
            Some(column) => unique_values(&self.data, column),
            None => Vec::new(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Applies new presentation settings.
    pub fn set_config(&mut self, config: TableConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.page_size != self.pagination.page_size() {
            self.pagination.set_page_size(config.page_size)?;
        }
        self.selection.set_mode(config.selection_mode);
        self.viewport.set_item_height(config.row_height);
        self.viewport.set_container_height(config.container_height);
        self.viewport.set_overscan(config.overscan);
        self.config = config;
        self.sync_presentation();
        Ok(())
    }

    // =========================================================================
    // Filters and sorts
    // =========================================================================

    /// Sets or clears the filter on `field`.
    ///
    /// A field holds at most one filter: a new one replaces the old in place,
    /// `None` removes it.
    pub fn set_filter(&mut self, field: &str, filter: Option<FilterCondition>) {
        self.note_unknown_field(field);
        let position = self.filters.iter().position(|f| f.field == field);
        match (filter, position) {
            (Some(mut filter), Some(i)) => {
                filter.field = field.to_string();
                self.filters[i] = filter;
            }
            (Some(mut filter), None) => {
                filter.field = field.to_string();
                self.filters.push(filter);
            }
            (None, Some(i)) => {
                self.filters.remove(i);
            }
            (None, None) => return,
        }
        self.refresh_query();
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        self.filters.clear();
        self.refresh_query();
    }

    /// Active filters in the order they were first set.
    pub fn filters(&self) -> &[FilterCondition] {
        &self.filters
    }

    /// Cycles the sort on `field`: unsorted, ascending, descending, unsorted.
    ///
    /// Other sort keys keep their position. A newly sorted field becomes the
    /// lowest-priority key. Returns the field's new direction.
    pub fn toggle_sort(&mut self, field: &str) -> Option<Direction> {
        self.note_unknown_field(field);
        let position = self.sorts.iter().position(|s| s.field == field);
        let direction = match position {
            None => {
                self.sorts.push(SortKey::asc(field));
                Some(Direction::Asc)
            }
            Some(i) if self.sorts[i].direction == Direction::Asc => {
                self.sorts[i].direction = Direction::Desc;
                Some(Direction::Desc)
            }
            Some(i) => {
                self.sorts.remove(i);
                None
            }
        };
        self.refresh_query();
        direction
    }

    /// Replaces the sort keys.
    pub fn set_sorts(&mut self, sorts: Vec<SortKey>) {
        for key in &sorts {
            self.note_unknown_field(&key.field);
        }
        self.sorts = sorts;
        self.refresh_query();
    }

    pub fn sorts(&self) -> &[SortKey] {
        &self.sorts
    }

    /// Current direction of `field`, if it is sorted.
    pub fn sort_direction(&self, field: &str) -> Option<Direction> {
        self.sorts.iter().find(|s| s.field == field).map(|s| s.direction)
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// Replaces the group-by fields. `None` or an empty list ungroups.
    ///
    /// Every group starts collapsed after the change.
    pub fn set_group_by(&mut self, fields: Option<Vec<String>>) {
        let fields = fields.unwrap_or_default();
        for field in &fields {
            self.note_unknown_field(field);
        }
        self.group_by = fields;
        self.expanded.clear();
        self.refresh_groups();
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// Expands or collapses the group with `key`. Returns whether it is now
    /// expanded.
    pub fn toggle_group_expanded(&mut self, key: &str) -> bool {
        let expanded = if self.expanded.remove(key) {
            false
        } else {
            self.expanded.insert(key.to_string());
            true
        };
        self.refresh_groups();
        expanded
    }

    /// Expands a set of group keys without collapsing any.
    pub fn expand<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded.extend(keys.into_iter().map(Into::into));
        self.refresh_groups();
    }

    /// Expands every group at every level.
    pub fn expand_all(&mut self) {
        let keys = group_keys(&self.processed, &self.group_by, &self.columns);
        self.expanded.extend(keys);
        self.refresh_groups();
    }

    /// Collapses every group.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.refresh_groups();
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Expanded group keys, including keys that no longer match a group.
    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects or deselects one row.
    pub fn toggle_row_selection(&mut self, record: &R) {
        if self.selection.toggle(record.key()) {
            self.notify_selection();
        }
    }

    /// Selects every filtered row, or clears the selection when exactly the
    /// filtered rows are already selected.
    pub fn toggle_all_selection(&mut self) {
        let keys = self.filtered_keys();
        let changed = if self.selection.equals(&keys) {
            self.selection.clear()
        } else {
            self.selection.replace(keys)
        };
        if changed {
            self.notify_selection();
        }
    }

    /// Alias of [`toggle_all_selection`](Self::toggle_all_selection).
    pub fn select_all(&mut self) {
        self.toggle_all_selection();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.notify_selection();
        }
    }

    pub fn is_selected(&self, record: &R) -> bool {
        self.selection.is_selected(&record.key())
    }

    /// Whether the selection is exactly the non-empty filtered set.
    pub fn is_all_selected(&self) -> bool {
        if self.processed.is_empty() {
            return false;
        }
        self.selection.equals(&self.filtered_keys())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected records in source order, including ones currently filtered
    /// out.
    pub fn selected_rows(&self) -> Vec<Arc<R>> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.data
            .iter()
            .filter(|r| self.selection.is_selected(&r.key()))
            .cloned()
            .collect()
    }

    /// Keys of the filtered rows in display order. Rows sharing an identity
    /// repeat their key.
    fn filtered_keys(&self) -> Vec<RowKey> {
        self.processed.iter().map(|r| r.key()).collect()
    }

    fn notify_selection(&mut self) {
        log::debug!("selection changed: {} selected", self.selection.len());
        if self.listener.is_none() {
            return;
        }
        let selected = self.selected_rows();
        if let Some(listener) = self.listener.as_mut() {
            listener.selection_changed(&selected);
        }
    }

    // =========================================================================
    // Paging and scrolling
    // =========================================================================

    /// Goes to a 1-based page, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page);
        self.pagination.clamp(self.rows.len());
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ConfigError> {
        self.pagination.set_page_size(page_size)?;
        self.config.page_size = page_size;
        Ok(())
    }

    pub fn page_info(&self) -> PageInfo {
        self.pagination.info(self.rows.len())
    }

    /// Scrolls the body to an absolute offset.
    pub fn scroll_to(&mut self, scroll_top: f64) -> Window {
        self.viewport.apply(ScrollRequest::ToOffset(scroll_top))
    }

    /// Applies a scroll request to the body.
    pub fn scroll(&mut self, request: ScrollRequest) -> Window {
        self.viewport.apply(request)
    }

    pub fn set_container_height(&mut self, height: f64) {
        self.viewport.set_container_height(height);
        self.config.container_height = self.viewport.container_height();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The scroll window over the display sequence.
    pub fn window(&self) -> Window {
        self.viewport.window()
    }

    // =========================================================================
    // Derived rows
    // =========================================================================

    /// Filtered and sorted records.
    pub fn processed_rows(&self) -> &[Arc<R>] {
        &self.processed
    }

    /// The whole grouped display sequence.
    pub fn rows(&self) -> &[DisplayRow<R>] {
        &self.rows
    }

    /// The rows to render: the scroll window when virtual scrolling is on,
    /// the current page otherwise.
    pub fn visible_rows(&self) -> &[DisplayRow<R>] {
        &self.rows[self.visible_range()]
    }

    fn visible_range(&self) -> std::ops::Range<usize> {
        if self.config.virtual_scrolling {
            let range = self.viewport.window().range();
            range.start.min(self.rows.len())..range.end.min(self.rows.len())
        } else {
            self.pagination.range(self.rows.len())
        }
    }

    /// Summaries over every filtered row.
    pub fn footer(&self) -> BTreeMap<String, Summary> {
        summarize(&self.processed, &self.columns)
    }

    /// A serializable snapshot of what the table currently shows.
    pub fn view(&self) -> TableView<'_, R> {
        let range = self.visible_range();
        let (mode, window, page) = if self.config.virtual_scrolling {
            (PresentationMode::Virtual, Some(self.window()), None)
        } else {
            (PresentationMode::Paged, None, Some(self.page_info()))
        };
        let state = if self.processed.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Ready
        };
        TableView {
            state,
            mode,
            first_index: range.start,
            rows: &self.rows[range],
            window,
            page,
            columns: self.columns.zones(),
            filters: &self.filters,
            sorts: &self.sorts,
            group_by: &self.group_by,
            total_records: self.data.len(),
            filtered_records: self.processed.len(),
            selected_count: self.selection.len(),
            all_selected: self.is_all_selected(),
            footer: self.config.sticky_footer.then(|| self.footer()),
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Hands an edit of `record.field` to `editor`.
    ///
    /// The table's own data is untouched; the host applies the edit and
    /// calls [`set_data`](Self::set_data).
    pub fn edit_cell(
        &self,
        record: &R,
        field: &str,
        value: Value,
        editor: &mut impl CellEditor<R>,
    ) -> Result<(), ConfigError> {
        let column = self
            .columns
            .get(field)
            .ok_or_else(|| ConfigError::unknown_column(field))?;
        if !column.editable {
            return Err(ConfigError::ReadOnlyColumn(field.to_string()));
        }
        log::debug!("edit {} on {}: {}", field, record.key(), value);
        editor.edit(record, field, value);
        Ok(())
    }

    /// Hands the filtered, sorted records and the visible columns, in render
    /// order, to `exporter`.
    pub fn export(&self, exporter: &mut impl Exporter<R>) -> Result<(), ExportError> {
        let zones = self.columns.zones();
        let columns: Vec<&Column<R>> = zones.iter().collect();
        log::debug!("export {} rows x {} columns", self.processed.len(), columns.len());
        exporter.export(&self.processed, &columns)
    }

    // =========================================================================
    // Recompute
    // =========================================================================

    fn refresh_query(&mut self) {
        let filtered = filter_rows(&self.data, &self.filters, &self.columns);
        self.processed = sort_rows(filtered, &self.sorts, &self.columns);
        log::debug!(
            "query: {} of {} records pass {} filters, {} sort keys",
            self.processed.len(),
            self.data.len(),
            self.filters.len(),
            self.sorts.len()
        );
        self.refresh_groups();
    }

    fn refresh_groups(&mut self) {
        self.rows = flatten(&self.processed, &self.group_by, &self.expanded, &self.columns);
        log::debug!(
            "grouping by {:?}: {} display rows, {} expanded",
            self.group_by,
            self.rows.len(),
            self.expanded.len()
        );
        self.sync_presentation();
    }

    fn sync_presentation(&mut self) {
        self.pagination.clamp(self.rows.len());
        self.viewport.set_item_count(self.rows.len());
    }

    fn note_unknown_field(&self, field: &str) {
        if self.columns.get(field).is_none() {
            log::debug!("field '{}' has no column, using direct lookup", field);
        }
    }
}
