//! Table documents: columns, records and initial state in one JSON file.

use std::fs;
use std::path::Path;

use datagrid_lib::TableConfig;
use datagrid_lib::TableController;
use datagrid_lib::error::ConfigError;
use datagrid_lib::model::Aggregation;
use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnType;
use datagrid_lib::model::Pin;
use datagrid_lib::model::Record;
use datagrid_lib::query::FilterCondition;
use datagrid_lib::query::SortKey;
use serde::Deserialize;

/// A table as read from disk.
///
/// ```json
/// {
///   "columns": [{ "field": "dept", "header": "Department" }],
///   "records": [{ "id": 1, "dept": "Eng" }],
///   "config": { "pageSize": 20 },
///   "groupBy": ["dept"],
///   "expanded": ["Eng"]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub config: TableConfig,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub sorts: Vec<SortKey>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub expanded: Vec<String>,
}

/// A column definition without a value getter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub field: String,
    /// Defaults to the field name.
    pub header: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
    #[serde(default = "enabled")]
    pub sortable: bool,
    #[serde(default = "enabled")]
    pub filterable: bool,
    #[serde(default = "enabled")]
    pub groupable: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub pinned: Pin,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    #[serde(default)]
    pub options: Vec<String>,
    pub aggregation: Option<Aggregation>,
}

fn enabled() -> bool {
    true
}

impl From<ColumnSpec> for Column<Record> {
    fn from(spec: ColumnSpec) -> Self {
        let header = spec.header.unwrap_or_else(|| spec.field.clone());
        let mut column = Column::new(spec.field, header)
            .kind(spec.kind)
            .sortable(spec.sortable)
            .filterable(spec.filterable)
            .groupable(spec.groupable)
            .editable(spec.editable)
            .hidden(spec.hidden)
            .pinned(spec.pinned)
            .width_bounds(spec.min_width, spec.max_width)
            .options(spec.options);
        if let Some(width) = spec.width {
            column = column.width(width);
        }
        if let Some(aggregation) = spec.aggregation {
            column = column.aggregate(aggregation);
        }
        column
    }
}

impl TableDocument {
    /// Reads a document from a JSON file.
    pub fn load(path: &Path) -> datagrid_lib::Result<Self> {
        let text = fs::read_to_string(path)?;
        let document = serde_json::from_str(&text)?;
        log::info!("loaded table document {}", path.display());
        Ok(document)
    }

    /// Builds a controller holding the document's records and state.
    pub fn into_controller(self) -> Result<TableController<Record>, ConfigError> {
        let columns: Vec<Column<Record>> = self.columns.into_iter().map(Column::from).collect();
        let mut table = TableController::new(columns, self.config)?.with_data(self.records);
        for filter in self.filters {
            let field = filter.field.clone();
            table.set_filter(&field, Some(filter));
        }
        if !self.sorts.is_empty() {
            table.set_sorts(self.sorts);
        }
        if !self.group_by.is_empty() {
            table.set_group_by(Some(self.group_by));
            table.expand(self.expanded);
        }
        log::debug!("{:?}", table);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_into_controller() {
        let document: TableDocument = serde_json::from_value(serde_json::json!({
            "columns": [
                { "field": "dept", "header": "Department", "pinned": "left" },
                {
                    "field": "salary",
                    "type": "number",
                    "aggregation": "avg",
                    "minWidth": 50,
                    "width": 10
                },
                { "field": "note", "sortable": false, "hidden": true }
            ],
            "records": [
                { "id": 1, "dept": "Eng", "salary": 100 },
                { "id": 2, "dept": "Eng", "salary": 200 },
                { "id": 3, "dept": "Sales", "salary": 50 }
            ],
            "config": { "pageSize": 10, "stickyFooter": true },
            "filters": [{ "field": "salary", "operator": "gt", "value": 60, "type": "number" }],
            "sorts": [{ "field": "salary", "direction": "desc" }],
            "groupBy": ["dept"],
            "expanded": ["Eng"]
        }))
        .unwrap();

        let table = document.into_controller().unwrap();
        assert_eq!(table.rows().len(), 3);
        assert!(table.is_expanded("Eng"));
        assert_eq!(table.config().page_size, 10);

        let columns = table.columns();
        let salary = columns.get("salary").unwrap();
        assert_eq!(salary.width, Some(50));
        assert_eq!(salary.aggregation, Some(Aggregation::Avg));
        assert_eq!(columns.get("note").unwrap().header, "note");
        assert!(!columns.get("note").unwrap().sortable);
        assert_eq!(columns.zones().left.len(), 1);

        let header = table.rows()[0].header().unwrap();
        assert_eq!(header.summaries["salary"].value, Some(150.0));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let document: TableDocument = serde_json::from_value(serde_json::json!({
            "columns": [{ "field": "a" }, { "field": "a" }]
        }))
        .unwrap();
        assert_eq!(
            document.into_controller().unwrap_err(),
            ConfigError::DuplicateColumn("a".into())
        );
    }
}
