mod common;

use std::sync::Arc;

use datagrid_lib::aggregate::aggregate;
use datagrid_lib::aggregate::aggregation_for;
use datagrid_lib::aggregate::summarize;
use datagrid_lib::model::Aggregation;
use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnSet;
use datagrid_lib::model::Record;
use datagrid_lib::model::Value;
use serde_json::json;

use common::*;

fn scores() -> Vec<Arc<Record>> {
    records(json!([
        { "score": 4 },
        { "score": "6" },
        { "score": "n/a" },
        { "score": null },
        { "score": 2.5 }
    ]))
}

fn score(kind: Aggregation) -> Column<Record> {
    Column::new("score", "Score").aggregate(kind)
}

#[test]
fn test_count_counts_every_member() {
    assert_eq!(aggregate(&scores(), &score(Aggregation::Count), Aggregation::Count), Some(5.0));
}

#[test]
fn test_non_numeric_values_are_skipped() {
    let rows = scores();
    assert_eq!(aggregate(&rows, &score(Aggregation::Sum), Aggregation::Sum), Some(12.5));
    assert_eq!(aggregate(&rows, &score(Aggregation::Min), Aggregation::Min), Some(2.5));
    assert_eq!(aggregate(&rows, &score(Aggregation::Max), Aggregation::Max), Some(6.0));
    let avg = aggregate(&rows, &score(Aggregation::Avg), Aggregation::Avg).unwrap();
    assert!((avg - 12.5 / 3.0).abs() < 1e-9);
}

#[test]
fn test_empty_numeric_set() {
    let rows = records(json!([{ "score": "n/a" }, {}]));
    assert_eq!(aggregate(&rows, &score(Aggregation::Sum), Aggregation::Sum), Some(0.0));
    assert_eq!(aggregate(&rows, &score(Aggregation::Avg), Aggregation::Avg), Some(0.0));
    assert_eq!(aggregate(&rows, &score(Aggregation::Min), Aggregation::Min), None);
    assert_eq!(aggregate(&rows, &score(Aggregation::Max), Aggregation::Max), None);
    assert_eq!(aggregate(&rows, &score(Aggregation::Count), Aggregation::Count), Some(2.0));
    assert_eq!(aggregate(&[], &score(Aggregation::Count), Aggregation::Count), Some(0.0));
}

#[test]
fn test_number_columns_default_to_sum() {
    let number = Column::<Record>::new("salary", "Salary").number();
    let text = Column::<Record>::new("name", "Name");
    let counted = Column::<Record>::new("name", "Name").aggregate(Aggregation::Count);
    assert_eq!(aggregation_for(&number), Some(Aggregation::Sum));
    assert_eq!(aggregation_for(&text), None);
    assert_eq!(aggregation_for(&counted), Some(Aggregation::Count));
}

#[test]
fn test_summarize_uses_every_aggregating_column() {
    let columns = ColumnSet::new(vec![
        Column::new("name", "Name").aggregate(Aggregation::Count),
        Column::new("dept", "Department"),
        Column::new("salary", "Salary").number(),
        Column::new("top", "Top").aggregate(Aggregation::Max).with_getter(|r: &Record| {
            r.get("salary").and_then(Value::to_number).into()
        }),
    ])
    .unwrap();

    let summaries = summarize(&employees(), &columns);
    assert_eq!(summaries.keys().collect::<Vec<_>>(), vec!["name", "salary", "top"]);
    assert_eq!(summaries["name"].value, Some(6.0));
    assert_eq!(summaries["salary"].value, Some(460.0));
    assert_eq!(summaries["top"].value, Some(120.0));
    assert_eq!(summaries["top"].label(), "Max");
}
