mod common;

use common::{Harness, many, roster};
use tabula::pagination::{page_size_options, page_window};
use tabula::prelude::*;

#[test]
fn test_page_count_is_ceil() {
    for (total, size, expected) in [(0, 5, 0), (1, 5, 1), (5, 5, 1), (6, 5, 2), (23, 10, 3)] {
        assert_eq!(Pagination::new(size).page_count(total), expected);
    }
}

#[test]
fn test_two_per_page_over_five_rows() {
    let harness = Harness::with(roster(), |props| props.page_size(2));
    let table = &harness.table;

    assert_eq!(table.page_count(), 3);
    assert_eq!(table.page_keys(), vec![1, 2]);

    assert_eq!(table.goto_page(2), EventResult::Consumed);
    assert_eq!(table.page_keys(), vec![5]);

    assert_eq!(table.goto_page(3), EventResult::Ignored);
    assert_eq!(table.pagination().page_index, 2);
    assert_eq!(table.page_keys(), vec![5]);
}

#[test]
fn test_previous_and_next_stop_at_bounds() {
    let harness = Harness::with(roster(), |props| props.page_size(2));
    let table = &harness.table;

    assert_eq!(table.previous_page(), EventResult::Ignored);
    assert_eq!(table.next_page(), EventResult::Consumed);
    assert_eq!(table.next_page(), EventResult::Consumed);
    assert_eq!(table.next_page(), EventResult::Ignored);
    assert_eq!(table.pagination().page_index, 2);
}

#[test]
fn test_page_clamped_when_filter_narrows() {
    let harness = Harness::with(many(30), |props| props.page_size(5));
    let table = &harness.table;

    table.goto_page(5);
    assert_eq!(table.pagination().page_index, 5);

    // Ids 1..=9 contain "Student 0"
    table.apply_filter(ActiveFilter::new(
        "name",
        "Name",
        FilterValue::Text("Student 0".into()),
    ));

    assert_eq!(table.total_rows(), 9);
    assert_eq!(table.pagination().page_index, 1);
    assert_eq!(table.page_keys(), vec![6, 7, 8, 9]);
}

#[test]
fn test_page_clamped_to_zero_when_nothing_matches() {
    let harness = Harness::with(many(12), |props| props.page_size(5));
    let table = &harness.table;
    table.goto_page(2);

    harness.search.set("nobody".into());

    assert_eq!(table.pagination().page_index, 0);
    assert!(table.page_keys().is_empty());
}

#[test]
fn test_page_size_change_resets_to_first_page() {
    let harness = Harness::with(many(30), |props| props.page_size(5));
    let table = &harness.table;
    table.goto_page(3);

    assert_eq!(table.set_page_size(20), EventResult::Consumed);

    let pagination = table.pagination();
    assert_eq!(pagination.page_size, 20);
    assert_eq!(pagination.page_index, 0);
    assert_eq!(table.page_count(), 2);
}

#[test]
fn test_page_size_must_be_an_option() {
    let harness = Harness::new(roster());
    assert_eq!(harness.table.set_page_size(7), EventResult::Ignored);
    assert_eq!(harness.table.set_page_size(10), EventResult::Ignored);
    assert_eq!(harness.table.set_page_size(0), EventResult::Ignored);
}

#[test]
fn test_initial_size_outside_presets_is_offered() {
    assert_eq!(page_size_options(7), vec![5, 7, 10, 20, 30, 40, 50]);
    assert_eq!(page_size_options(10), PAGE_SIZE_OPTIONS.to_vec());

    let harness = Harness::with(many(20), |props| props.page_size(7));
    let view = harness.table.render();
    assert_eq!(view.page_size.current, 7);
    assert!(view.page_size.options.contains(&7));
    assert_eq!(view.rows.len(), 7);
}

#[test]
fn test_page_window_stays_in_range() {
    assert_eq!(page_window(0, 3), 0..3);
    assert_eq!(page_window(0, 10), 0..5);
    assert_eq!(page_window(5, 10), 3..8);
    assert_eq!(page_window(9, 10), 5..10);
    assert_eq!(page_window(0, 0), 0..0);
}

#[test]
fn test_pagination_view() {
    let harness = Harness::with(many(30), |props| props.page_size(5));
    let table = &harness.table;

    let view = table.render();
    let pagination = view.pagination.unwrap();
    assert_eq!(pagination.page_count, 6);
    assert_eq!(pagination.window, vec![0, 1, 2, 3, 4]);
    assert!(!pagination.previous.enabled);
    assert!(pagination.next.enabled);

    table.goto_page(5);
    let pagination = table.render().pagination.unwrap();
    assert_eq!(pagination.window, vec![1, 2, 3, 4, 5]);
    assert!(pagination.previous.enabled);
    assert!(!pagination.next.enabled);
}

#[test]
fn test_no_pagination_view_for_single_page() {
    let harness = Harness::new(roster());
    assert!(harness.table.render().pagination.is_none());
}
