mod common;

use std::collections::HashSet;
use std::sync::Arc;

use datagrid_lib::group::DisplayRow;
use datagrid_lib::group::GroupHeader;
use datagrid_lib::group::UNGROUPED;
use datagrid_lib::group::flatten;
use datagrid_lib::group::group_key;
use datagrid_lib::group::group_keys;
use datagrid_lib::model::Aggregation;
use datagrid_lib::model::Record;
use datagrid_lib::model::TableRow;
use serde_json::json;

use common::*;

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn expanded(keys: &[&str]) -> HashSet<String> {
    keys.iter().map(|s| s.to_string()).collect()
}

fn headers(rows: &[DisplayRow<Record>]) -> Vec<&GroupHeader> {
    rows.iter().filter_map(DisplayRow::header).collect()
}

/// Compact shape of a display sequence: `G:<key>` or `D:<id>@<level>`.
fn shape(rows: &[DisplayRow<Record>]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            DisplayRow::Group(h) => format!("G:{}", h.group_key),
            DisplayRow::Data(d) => {
                let id = d.record.field("id").map(|v| v.to_string()).unwrap_or_default();
                format!("D:{}@{}", id, d.level)
            }
        })
        .collect()
}

#[test]
fn test_no_group_fields_passes_rows_through() {
    let rows = employees();
    let out = flatten(&rows, &[], &HashSet::new(), &columns());
    assert_eq!(out.len(), rows.len());
    assert!(out.iter().all(|r| !r.is_group_header() && r.level() == 0));
    let records: Vec<Arc<Record>> = out.iter().filter_map(|r| r.record().cloned()).collect();
    assert_eq!(ids(&records), ids(&rows));
}

#[test]
fn test_collapsed_groups_show_headers_only() {
    let out = flatten(&employees(), &fields(&["dept"]), &HashSet::new(), &columns());
    assert_eq!(shape(&out), vec!["G:Eng", "G:Sales", format!("G:{UNGROUPED}").as_str()]);

    let counts: Vec<usize> = headers(&out).iter().map(|h| h.item_count).collect();
    assert_eq!(counts, vec![3, 2, 1]);
    assert!(headers(&out).iter().all(|h| h.level == 0 && !h.expanded && h.field == "dept"));
}

#[test]
fn test_missing_null_and_empty_values_are_ungrouped() {
    let rows = records(json!([
        { "id": 1, "team": "a" },
        { "id": 2 },
        { "id": 3, "team": null },
        { "id": 4, "team": "" },
        { "id": 5, "team": 0 },
        { "id": 6, "team": false }
    ]));
    let out = flatten(&rows, &fields(&["team"]), &expanded(&[UNGROUPED]), &columns());
    assert_eq!(
        shape(&out),
        vec!["G:a", "G:Ungrouped", "D:2@2", "D:3@2", "D:4@2", "G:0", "G:false"]
    );
}

#[test]
fn test_expanded_group_children_follow_header() {
    let out = flatten(&employees(), &fields(&["dept"]), &expanded(&["Sales"]), &columns());
    assert_eq!(shape(&out), vec!["G:Eng", "G:Sales", "D:2@2", "D:5@2", "G:Ungrouped"]);
    assert!(headers(&out)[1].expanded);
}

#[test]
fn test_nested_groups() {
    let group_by = fields(&["dept", "office"]);
    let open = expanded(&["Eng", "Eng|NYC", "Sales|NYC"]);
    let out = flatten(&employees(), &group_by, &open, &columns());
    assert_eq!(
        shape(&out),
        vec!["G:Eng", "G:Eng|NYC", "D:1@3", "D:4@3", "G:Eng|SF", "G:Sales", "G:Ungrouped"]
    );

    let nested = headers(&out)[1];
    assert_eq!(nested.group_value, "NYC");
    assert_eq!(nested.level, 1);
    assert_eq!(nested.field, "office");
    assert_eq!(nested.item_count, 2);
}

#[test]
fn test_nested_item_count_is_direct_partition_size() {
    let group_by = fields(&["dept", "office"]);
    let keys = group_keys(&employees(), &group_by, &columns());
    let all: HashSet<String> = keys.into_iter().collect();
    let out = flatten(&employees(), &group_by, &all, &columns());

    let eng: Vec<usize> = headers(&out)
        .iter()
        .filter(|h| h.group_key.starts_with("Eng"))
        .map(|h| h.item_count)
        .collect();
    assert_eq!(eng, vec![3, 2, 1]);
}

#[test]
fn test_top_level_counts_sum_to_row_count() {
    let rows = employees();
    let choices = [
        fields(&["dept"]),
        fields(&["office"]),
        fields(&["dept", "office"]),
        fields(&["active"]),
    ];
    for group_by in choices {
        let out = flatten(&rows, &group_by, &HashSet::new(), &columns());
        let total: usize = headers(&out)
            .iter()
            .filter(|h| h.level == 0)
            .map(|h| h.item_count)
            .sum();
        assert_eq!(total, rows.len(), "group by {:?}", group_by);
    }
}

#[test]
fn test_collapse_and_expand_round_trip() {
    let rows = employees();
    let group_by = fields(&["dept", "office"]);
    let columns = columns();
    let keys = group_keys(&rows, &group_by, &columns);
    let mut state: HashSet<String> = keys.iter().cloned().collect();
    let initial = flatten(&rows, &group_by, &state, &columns);

    for key in &keys {
        state.remove(key);
    }
    let collapsed = flatten(&rows, &group_by, &state, &columns);
    assert_eq!(collapsed.len(), 3);

    for key in &keys {
        state.insert(key.clone());
    }
    let again = flatten(&rows, &group_by, &state, &columns);
    assert_eq!(again, initial);

    let data_rows = initial.iter().filter(|r| !r.is_group_header()).count();
    assert_eq!(data_rows, rows.len());
}

#[test]
fn test_collapsed_parent_hides_expanded_children() {
    let group_by = fields(&["dept", "office"]);
    let out = flatten(&employees(), &group_by, &expanded(&["Eng|NYC", "Eng|SF"]), &columns());
    assert_eq!(shape(&out), vec!["G:Eng", "G:Sales", "G:Ungrouped"]);
}

#[test]
fn test_group_summaries() {
    let out = flatten(&employees(), &fields(&["dept"]), &HashSet::new(), &columns());
    let eng = headers(&out)[0];
    let salary = &eng.summaries["salary"];
    assert_eq!(salary.kind, Aggregation::Sum);
    assert_eq!(salary.value, Some(310.0));
    assert!(!eng.summaries.contains_key("name"));

    let sales = headers(&out)[1];
    assert_eq!(sales.summaries["salary"].value, Some(80.0));
}

#[test]
fn test_group_key_joins_path() {
    assert_eq!(group_key("", "Eng"), "Eng");
    assert_eq!(group_key("Eng", "NYC"), "Eng|NYC");
    assert_eq!(
        group_keys(&employees(), &fields(&["dept", "office"]), &columns()),
        vec![
            "Eng",
            "Eng|NYC",
            "Eng|SF",
            "Sales",
            "Sales|SF",
            "Sales|NYC",
            "Ungrouped",
            "Ungrouped|SF"
        ]
    );
}

#[test]
fn test_display_row_serialization() {
    let out = flatten(&employees(), &fields(&["dept"]), &expanded(&["Sales"]), &columns());
    let json = serde_json::to_value(&out[1..3]).unwrap();
    assert_eq!(json[0]["type"], "group");
    assert_eq!(json[0]["groupKey"], "Sales");
    assert_eq!(json[0]["itemCount"], 2);
    assert_eq!(json[0]["summaries"]["salary"]["value"], 80.0);
    assert_eq!(json[1]["type"], "data");
    assert_eq!(json[1]["level"], 2);
    assert_eq!(json[1]["record"]["name"], "bob");
}
