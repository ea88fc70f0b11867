mod common;

use datagrid_lib::model::Column;
use datagrid_lib::model::ColumnSet;
use datagrid_lib::model::ColumnType;
use datagrid_lib::model::Record;
use datagrid_lib::model::TableRow;
use datagrid_lib::model::Value;
use datagrid_lib::query::FilterCondition;
use datagrid_lib::query::FilterOperator;
use datagrid_lib::query::FilterValue;
use datagrid_lib::query::filter_rows;
use datagrid_lib::query::matches;
use datagrid_lib::query::unique_values;
use serde_json::json;

use common::*;

fn run(filters: &[FilterCondition]) -> Vec<String> {
    ids(&filter_rows(&employees(), filters, &columns()))
}

// =============================================================================
// Text operators
// =============================================================================

#[test]
fn test_contains_is_case_insensitive() {
    assert_eq!(run(&[FilterCondition::contains("name", "B")]), vec!["2"]);
    assert_eq!(run(&[FilterCondition::contains("name", "e")]), vec!["3", "5"]);
}

#[test]
fn test_starts_and_ends_with() {
    assert_eq!(run(&[FilterCondition::starts_with("office", "n")]), vec!["1", "4", "5"]);
    assert_eq!(run(&[FilterCondition::ends_with("name", "N")]), vec!["4", "6"]);
}

#[test]
fn test_text_operators_on_numbers_use_text_form() {
    assert_eq!(run(&[FilterCondition::starts_with("salary", "1")]), vec!["1", "3"]);
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_equals_text_compares_string_forms() {
    assert_eq!(run(&[FilterCondition::equals("salary", "90")]), vec!["4"]);
    assert_eq!(run(&[FilterCondition::equals("dept", "eng")]), Vec::<String>::new());
}

#[test]
fn test_equals_boolean_is_strict() {
    let filter = FilterCondition::equals("active", true).with_kind(ColumnType::Boolean);
    // Dan's "true" is a string and does not match
    assert_eq!(run(&[filter]), vec!["1", "3", "5"]);
}

#[test]
fn test_equals_select_does_not_coerce() {
    let rows = records(json!([{ "code": 1 }, { "code": "1" }, { "code": 1.0 }]));
    let filter = FilterCondition::equals("code", 1).with_kind(ColumnType::Select);
    let kept = filter_rows(&rows, &[filter], &ColumnSet::default());
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|r| r.field("code").is_some_and(Value::is_numeric)));
}

// =============================================================================
// Relational operators
// =============================================================================

#[test]
fn test_relational() {
    assert_eq!(run(&[FilterCondition::gt("salary", 90)]), vec!["1", "3"]);
    assert_eq!(run(&[FilterCondition::gte("salary", 90)]), vec!["1", "3", "4"]);
    assert_eq!(run(&[FilterCondition::lt("salary", 80)]), vec!["6"]);
    assert_eq!(run(&[FilterCondition::lte("salary", "80")]), vec!["2", "6"]);
}

#[test]
fn test_relational_rejects_non_numeric() {
    assert!(run(&[FilterCondition::gt("name", 0)]).is_empty());
    assert!(run(&[FilterCondition::gt("salary", "abc")]).is_empty());
}

#[test]
fn test_gte_range() {
    let bounded = FilterCondition::range("salary", Some(80), Some(100));
    assert_eq!(run(&[bounded]), vec!["2", "3", "4"]);

    let open = FilterCondition::range("salary", Some(100), None::<i32>);
    assert_eq!(run(&[open]), vec!["1", "3"]);

    let no_min = FilterCondition::range("salary", None::<i32>, Some(100));
    assert!(run(&[no_min]).is_empty());
}

#[test]
fn test_lte_range() {
    let range = FilterValue::Range {
        min: None,
        max: Some(Value::from(90)),
    };
    let filter = FilterCondition::new("salary", FilterOperator::Lte, range);
    assert_eq!(run(&[filter]), vec!["2", "4", "6"]);

    let range = FilterValue::Range {
        min: Some(Value::from(75)),
        max: Some(Value::from(90)),
    };
    let filter = FilterCondition::new("salary", FilterOperator::Lte, range);
    assert_eq!(run(&[filter]), vec!["2", "4"]);
}

// =============================================================================
// Membership
// =============================================================================

#[test]
fn test_in_list() {
    let filter = FilterCondition::any_of("office", ["SF"]);
    assert_eq!(run(&[filter]), vec!["2", "3", "6"]);

    let filter = FilterCondition::any_of("salary", [80, 90]);
    assert_eq!(run(&[filter]), vec!["2", "4"]);
}

#[test]
fn test_in_scalar_is_string_equality() {
    let filter = FilterCondition::new("dept", FilterOperator::In, Value::from("Sales"));
    assert_eq!(run(&[filter]), vec!["2", "5"]);
}

// =============================================================================
// Combination and resolution
// =============================================================================

#[test]
fn test_null_never_matches() {
    let rows = employees();
    let eve = &rows[4];
    let columns = columns();
    let salary = columns.get("salary");
    for filter in [
        FilterCondition::contains("salary", ""),
        FilterCondition::equals("salary", ""),
        FilterCondition::gte("salary", -1_000_000),
        FilterCondition::any_of("salary", [Value::Null]),
    ] {
        assert!(!matches(eve.as_ref(), &filter, salary), "{:?}", filter.operator);
    }
    assert!(!matches(eve.as_ref(), &FilterCondition::contains("missing", ""), None));
}

#[test]
fn test_filters_combine_with_and() {
    let filters = [
        FilterCondition::equals("dept", "Eng"),
        FilterCondition::equals("office", "NYC"),
    ];
    assert_eq!(run(&filters), vec!["1", "4"]);
}

#[test]
fn test_filtering_is_idempotent() {
    let filters = [
        FilterCondition::contains("office", "s"),
        FilterCondition::gte("salary", 75),
    ];
    let columns = columns();
    let once = filter_rows(&employees(), &filters, &columns);
    let twice = filter_rows(&once, &filters, &columns);
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(ids(&once), vec!["2", "3"]);
}

#[test]
fn test_getter_supersedes_lookup() {
    let columns = ColumnSet::new(vec![Column::<Record>::new("band", "Band").with_getter(|r| {
        match r.get("salary").and_then(Value::to_number) {
            Some(n) if n >= 100.0 => Value::from("high"),
            Some(_) => Value::from("low"),
            None => Value::Null,
        }
    })])
    .unwrap();
    let kept = filter_rows(&employees(), &[FilterCondition::equals("band", "high")], &columns);
    assert_eq!(ids(&kept), vec!["1", "3"]);
}

#[test]
fn test_unknown_field_uses_direct_lookup() {
    let rows = records(json!([{ "nick": "ace" }, { "nick": "bee" }]));
    let kept = filter_rows(&rows, &[FilterCondition::contains("nick", "ce")], &columns());
    assert_eq!(field(&kept, "nick"), vec!["ace"]);
}

#[test]
fn test_unique_values() {
    let rows = employees();
    let columns = columns();
    let offices = columns.get("office").unwrap();
    assert_eq!(unique_values(&rows, offices), vec!["NYC", "SF"]);

    let salary = columns.get("salary").unwrap();
    assert_eq!(unique_values(&rows, salary), vec!["100", "120", "70", "80", "90"]);
}

#[test]
fn test_filter_condition_from_json() {
    let filter: FilterCondition = serde_json::from_value(json!({
        "field": "salary",
        "operator": "gte",
        "value": { "min": 80, "max": 100 },
        "type": "number"
    }))
    .unwrap();
    assert_eq!(filter, FilterCondition::range("salary", Some(80), Some(100)));

    let filter: FilterCondition = serde_json::from_value(json!({
        "field": "office",
        "operator": "in",
        "value": ["SF", "NYC"]
    }))
    .unwrap();
    assert_eq!(filter.value, FilterValue::List(vec![Value::from("SF"), Value::from("NYC")]));
    assert_eq!(filter.kind, ColumnType::Text);
}
