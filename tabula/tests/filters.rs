mod common;

use common::{Harness, date, roster, student};
use tabula::prelude::*;

fn ids(harness: &Harness) -> Vec<u32> {
    harness.table.page_keys()
}

#[test]
fn test_text_filter_keeps_original_order() {
    let harness = Harness::new(vec![
        student(1, "Ana", 20, "eng"),
        student(2, "Luis", 21, "eng"),
        student(3, "Ana", 22, "law"),
    ]);

    let result = harness.table.apply_filter(ActiveFilter::new(
        "name",
        "Name",
        FilterValue::Text("Ana".into()),
    ));

    assert_eq!(result, EventResult::Consumed);
    assert_eq!(ids(&harness), vec![1, 3]);
}

#[test]
fn test_apply_calls_hook_before_filters_change() {
    let harness = Harness::new(roster());

    harness.table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("law".into()),
    ));

    assert_eq!(harness.calls(), vec!["apply:career", "filters:1"]);
    assert_eq!(harness.filters.get().len(), 1);
}

#[test]
fn test_apply_replaces_same_key_in_place() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    table.apply_filter(ActiveFilter::new("name", "Name", FilterValue::Text("a".into())));
    table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("eng".into()),
    ));
    table.apply_filter(ActiveFilter::new("name", "Name", FilterValue::Text("carla".into())));

    let filters = harness.filters.get();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[0].key, "name");
    assert_eq!(filters[0].value, FilterValue::Text("carla".into()));
    assert_eq!(ids(&harness), vec![3]);
}

#[test]
fn test_filter_order_does_not_matter() {
    let career = ActiveFilter::new("career", "Career", FilterValue::Select("law".into()));
    let age = ActiveFilter::new(
        "age",
        "Age",
        FilterValue::Range {
            min: Some(26.0),
            max: None,
        },
    );

    let first = Harness::new(roster());
    first.table.apply_filter(career.clone());
    first.table.apply_filter(age.clone());

    let second = Harness::new(roster());
    second.table.apply_filter(age);
    second.table.apply_filter(career);

    assert_eq!(ids(&first), vec![5]);
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_removing_a_filter_restores_remaining_set() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("eng".into()),
    ));
    let only_career = ids(&harness);

    table.apply_filter(ActiveFilter::new(
        "age",
        "Age",
        FilterValue::Range {
            min: None,
            max: Some(20.0),
        },
    ));
    assert_eq!(ids(&harness), vec![1]);

    assert_eq!(table.remove_filter("age"), EventResult::Consumed);
    assert_eq!(ids(&harness), only_career);
    assert!(harness.calls().contains(&"clear:age".to_string()));
}

#[test]
fn test_remove_unknown_filter_is_ignored() {
    let harness = Harness::new(roster());
    assert_eq!(harness.table.remove_filter("name"), EventResult::Ignored);
    assert!(harness.calls().is_empty());
}

#[test]
fn test_apply_rejects_kind_mismatch() {
    let harness = Harness::new(roster());
    let result = harness
        .table
        .apply_filter(ActiveFilter::new("name", "Name", FilterValue::Number(3.0)));
    assert_eq!(result, EventResult::Ignored);
    assert!(harness.filters.get().is_empty());
}

#[test]
fn test_clear_all_resets_filters_and_drafts() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    table.pick_filter(Some("name".into()));
    table.draft_text("ana".into());
    table.apply_draft();
    table.pick_filter(Some("age".into()));
    table.draft_range(Some(10.0), None);

    assert_eq!(table.clear_all_filters(), EventResult::Consumed);

    assert!(harness.filters.get().is_empty());
    assert!(table.drafts().is_empty());
    assert_eq!(table.picked_filter(), None);
    assert!(harness.calls().ends_with(&["clear_all".to_string(), "filters:0".to_string()]));
}

#[test]
fn test_filter_keys_fall_back_to_record_fields() {
    let harness = Harness::new(roster());

    // "id" is a filter but not a column
    harness
        .table
        .apply_filter(ActiveFilter::new("id", "Id", FilterValue::Number(4.0)));

    assert_eq!(ids(&harness), vec![4]);
}

#[test]
fn test_date_and_boolean_filters() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    table.apply_filter(ActiveFilter::new(
        "enrolled",
        "Enrolled",
        FilterValue::Date(date(2024, 3, 3)),
    ));
    assert_eq!(ids(&harness), vec![2]);

    table.remove_filter("enrolled");
    table.apply_filter(ActiveFilter::new("active", "Active", FilterValue::Boolean(true)));
    assert_eq!(ids(&harness), vec![1, 3, 5]);
}

#[test]
fn test_filters_set_by_caller_apply_too() {
    let harness = Harness::new(roster());

    harness.filters.set(vec![ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("med".into()),
    )]);

    assert_eq!(ids(&harness), vec![4]);
}

#[test]
fn test_drafts_dropped_when_caller_removes_filter() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    table.pick_filter(Some("name".into()));
    table.draft_text("ana".into());
    table.apply_draft();
    table.pick_filter(Some("age".into()));
    table.draft_range(Some(1.0), Some(99.0));
    table.apply_draft();
    assert_eq!(harness.filters.get().len(), 2);

    harness
        .filters
        .update(|filters| filters.retain(|f| f.key != "name"));

    let drafts = table.drafts();
    assert!(!drafts.has_draft("name"));
    assert!(drafts.has_draft("age"));

    harness.filters.set(Vec::new());
    assert!(table.drafts().is_empty());
}
