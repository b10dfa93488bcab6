mod common;

use common::{Harness, date, roster};
use tabula::prelude::*;
use tabula::toolbar::FilterSection;

fn section(harness: &Harness) -> FilterSection {
    harness.table.render().toolbar.filters.unwrap()
}

#[test]
fn test_policy_table() {
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Text), ApplyPolicy::Explicit);
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Number), ApplyPolicy::Explicit);
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Range), ApplyPolicy::Explicit);
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Select), ApplyPolicy::Immediate);
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Date), ApplyPolicy::Immediate);
    assert_eq!(ApplyPolicy::for_kind(FilterKindTag::Boolean), ApplyPolicy::Unsupported);
}

#[test]
fn test_title_create_and_search() {
    let harness = Harness::new(roster());
    let toolbar = harness.table.render().toolbar;

    assert_eq!(toolbar.title, "Students");
    assert_eq!(toolbar.create.unwrap().label, "Create");
    assert_eq!(toolbar.search.value, "");
    assert!(!toolbar.search.clearable);
    assert!(toolbar.selection.is_none());
}

#[test]
fn test_picker_lists_all_and_marks_applied() {
    let harness = Harness::new(roster());
    harness.table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("law".into()),
    ));

    let section = section(&harness);
    assert_eq!(section.picker.len(), 6);
    let labels = Labels::english();
    let displayed: Vec<String> = section.picker.iter().map(|o| o.display(&labels)).collect();
    assert_eq!(displayed[2], "Career (applied)");
    assert_eq!(displayed[0], "Name");
}

#[test]
fn test_chips_and_clear_all() {
    let harness = Harness::new(roster());
    assert!(section(&harness).clear_all.is_none());

    harness.table.apply_filter(ActiveFilter::new(
        "career",
        "Career",
        FilterValue::Select("law".into()),
    ));
    harness.table.apply_filter(ActiveFilter::new(
        "age",
        "Age",
        FilterValue::Range {
            min: Some(18.0),
            max: None,
        },
    ));

    let section = section(&harness);
    let texts: Vec<&str> = section.chips.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Law", "≥18"]);
    assert!(section.clear_all.is_some());
}

#[test]
fn test_text_editor_apply_and_clear_visibility() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("name".into()));

    let editor = section(&harness).editor.unwrap();
    assert_eq!(editor.policy, ApplyPolicy::Explicit);
    assert!(!editor.apply.unwrap().enabled);
    assert!(editor.clear.is_none());

    table.draft_text("car".into());
    let editor = section(&harness).editor.unwrap();
    assert!(editor.apply.unwrap().enabled);
    assert!(editor.clear.is_some());

    // Typing alone applies nothing.
    assert!(harness.filters.get().is_empty());

    assert_eq!(table.apply_draft(), EventResult::Consumed);
    assert_eq!(table.page_keys(), vec![3]);
}

#[test]
fn test_number_editor_requires_parsable_draft() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("id".into()));

    table.draft_text("two".into());
    let editor = section(&harness).editor.unwrap();
    assert!(!editor.apply.unwrap().enabled);
    assert!(editor.clear.is_some());
    assert_eq!(table.apply_draft(), EventResult::Ignored);

    table.draft_text("2".into());
    assert_eq!(table.apply_draft(), EventResult::Consumed);
    assert_eq!(table.page_keys(), vec![2]);
}

#[test]
fn test_range_editor() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("age".into()));

    match section(&harness).editor.unwrap().control {
        EditorControl::Range { min, max, bounds, .. } => {
            assert_eq!((min, max), (None, None));
            assert_eq!(bounds, (Some(0.0), Some(120.0)));
        }
        other => panic!("unexpected control {:?}", other),
    }
    assert_eq!(table.apply_draft(), EventResult::Ignored);

    table.draft_range(Some(22.0), Some(28.0));
    table.apply_draft();

    assert_eq!(table.page_keys(), vec![2, 4, 5]);
    assert_eq!(section(&harness).chips[0].text, "≥22 - ≤28");
}

#[test]
fn test_select_applies_immediately() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("career".into()));

    let editor = section(&harness).editor.unwrap();
    assert_eq!(editor.policy, ApplyPolicy::Immediate);
    assert!(editor.apply.is_none());

    assert_eq!(table.pick_option("med".into()), EventResult::Consumed);
    assert_eq!(table.page_keys(), vec![4]);
    assert_eq!(table.pick_option("art".into()), EventResult::Ignored);

    assert_eq!(table.pick_option(String::new()), EventResult::Consumed);
    assert!(harness.filters.get().is_empty());
}

#[test]
fn test_date_applies_immediately() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("enrolled".into()));

    table.pick_date(Some(date(2024, 3, 5)));
    assert_eq!(table.page_keys(), vec![4]);
    match section(&harness).editor.unwrap().control {
        EditorControl::Date { value } => assert_eq!(value, Some(date(2024, 3, 5))),
        other => panic!("unexpected control {:?}", other),
    }

    table.pick_date(None);
    assert!(harness.filters.get().is_empty());
}

#[test]
fn test_boolean_has_no_editor() {
    let harness = Harness::new(roster());
    harness.table.pick_filter(Some("active".into()));

    let section = section(&harness);
    assert_eq!(section.picked.as_deref(), Some("active"));
    assert!(section.editor.is_none());
}

#[test]
fn test_reopening_applied_filter_prefills_draft() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.apply_filter(ActiveFilter::new("name", "Name", FilterValue::Text("elena".into())));

    table.pick_filter(Some("name".into()));

    match section(&harness).editor.unwrap().control {
        EditorControl::Text { value, .. } => assert_eq!(value, "elena"),
        other => panic!("unexpected control {:?}", other),
    }
}

#[test]
fn test_editor_clear_removes_applied_filter() {
    let harness = Harness::new(roster());
    let table = &harness.table;
    table.pick_filter(Some("name".into()));
    table.draft_text("ana".into());
    table.apply_draft();
    assert_eq!(harness.filters.get().len(), 1);

    assert_eq!(table.clear_draft(), EventResult::Consumed);

    assert!(harness.filters.get().is_empty());
    assert!(!table.drafts().has_draft("name"));
    assert_eq!(table.page_keys().len(), 5);
}

#[test]
fn test_unknown_filter_cannot_be_picked() {
    let harness = Harness::new(roster());
    assert_eq!(harness.table.pick_filter(Some("nope".into())), EventResult::Ignored);
    assert_eq!(harness.table.draft_text("x".into()), EventResult::Ignored);
}

#[test]
fn test_filters_disabled_hides_section_keeps_search() {
    let harness = Harness::with(roster(), |props| props.enable_filters(false));
    let table = &harness.table;

    let toolbar = table.render().toolbar;
    assert!(toolbar.filters.is_none());
    assert_eq!(toolbar.search.placeholder, "Search...");

    assert_eq!(table.pick_filter(Some("name".into())), EventResult::Ignored);
    assert_eq!(table.search_input("ana".into()), EventResult::Consumed);
    assert_eq!(table.page_keys(), vec![1]);
}

#[test]
fn test_spanish_labels() {
    let harness = Harness::with(roster(), |props| props.labels(Labels::for_locale("es")));
    harness.table.toggle_row(1);

    let toolbar = harness.table.render().toolbar;
    assert_eq!(toolbar.create.unwrap().label, "Crear");
    assert_eq!(toolbar.selection.unwrap().text, "1 seleccionados");
}
