mod common;

use common::{Harness, roster};
use tabula::prelude::*;
use tabula::search::GlobalSearch;

#[test]
fn test_blank_query_filters_nothing() {
    assert!(GlobalSearch::new("   ", SearchMode::Contains).is_none());
}

#[test]
fn test_contains_is_case_insensitive() {
    let mut search = GlobalSearch::new("ANA", SearchMode::Contains).unwrap();
    assert!(search.matches(["Mariana", "x"]));
    assert!(!search.matches(["Luis"]));
}

#[test]
fn test_fuzzy_matches_scattered_letters() {
    let mut search = GlobalSearch::new("dgo", SearchMode::Fuzzy).unwrap();
    assert!(search.matches(["Diego"]));
    assert!(!search.matches(["Elena"]));
}

#[test]
fn test_search_reaches_caller_and_filters_rows() {
    let harness = Harness::new(roster());
    let table = &harness.table;

    assert_eq!(table.search_input("bru".into()), EventResult::Consumed);

    assert_eq!(harness.search.get(), "bru");
    assert_eq!(harness.calls(), vec!["search:bru"]);
    assert_eq!(table.page_keys(), vec![2]);

    let search = table.render().toolbar.search;
    assert_eq!(search.value, "bru");
    assert!(search.clearable);
}

#[test]
fn test_search_matches_rendered_cell_text() {
    let harness = Harness::new(roster());
    harness.table.search_input("medicine".into());
    assert_eq!(harness.table.page_keys(), vec![4]);
}

#[test]
fn test_same_search_is_ignored() {
    let harness = Harness::new(roster());
    harness.table.search_input("ana".into());
    assert_eq!(harness.table.search_input("ana".into()), EventResult::Ignored);
    assert_eq!(harness.calls().len(), 1);
}

#[test]
fn test_clear_search() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    assert_eq!(table.clear_search(), EventResult::Ignored);

    table.search_input("ana".into());
    assert_eq!(table.clear_search(), EventResult::Consumed);
    assert_eq!(harness.search.get(), "");
    assert_eq!(table.page_keys().len(), 5);
}

#[test]
fn test_fuzzy_mode_table() {
    let harness = Harness::with(roster(), |props| props.search_mode(SearchMode::Fuzzy));
    harness.table.search_input("crl".into());
    assert_eq!(harness.table.page_keys(), vec![3]);
}

#[test]
fn test_search_combines_with_filters() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("law".into()),
    ));
    table.search_input("e".into());

    assert_eq!(table.page_keys(), vec![5]);
}
