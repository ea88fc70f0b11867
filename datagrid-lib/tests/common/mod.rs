//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnSet;
use datagrid_lib::model::Record;
use datagrid_lib::model::TableRow;
use serde_json::json;

/// Parses a JSON array of flat objects into shared records.
pub fn records(value: serde_json::Value) -> Vec<Arc<Record>> {
    serde_json::from_value::<Vec<Record>>(value)
        .unwrap()
        .into_iter()
        .map(Arc::new)
        .collect()
}

/// Six employees over two departments and two offices, plus one without a
/// department.
pub fn employees() -> Vec<Arc<Record>> {
    records(json!([
        { "id": 1, "name": "Ada", "dept": "Eng", "office": "NYC", "salary": 120, "active": true },
        { "id": 2, "name": "bob", "dept": "Sales", "office": "SF", "salary": 80, "active": false },
        { "id": 3, "name": "Cleo", "dept": "Eng", "office": "SF", "salary": 100, "active": true },
        { "id": 4, "name": "Dan", "dept": "Eng", "office": "NYC", "salary": 90, "active": "true" },
        { "id": 5, "name": "Eve", "dept": "Sales", "office": "NYC", "salary": null,
          "active": true },
        { "id": 6, "name": "Finn", "dept": "", "office": "SF", "salary": 70, "active": false }
    ]))
}

pub fn columns() -> ColumnSet<Record> {
    ColumnSet::new(vec![
        Column::new("id", "ID").number(),
        Column::new("name", "Name"),
        Column::new("dept", "Department"),
        Column::new("office", "Office"),
        Column::new("salary", "Salary").number(),
        Column::new("active", "Active").kind(datagrid_lib::model::ColumnType::Boolean),
    ])
    .unwrap()
}

/// The `id` of every row, as text.
pub fn ids(rows: &[Arc<Record>]) -> Vec<String> {
    field(rows, "id")
}

/// One field of every row, as text.
pub fn field(rows: &[Arc<Record>], name: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r.field(name).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}
