//! Toolbar above the table: title, create action, global search, the
//! advanced filter section and the selection panel.

mod editor;

pub use editor::{ApplyPolicy, EditorControl, FilterEditorView};
pub(crate) use editor::{draft_filter, editor_view, seed_draft};

use crate::filter::{ActiveFilter, FilterDescriptor, FilterState, format_chip};
use crate::labels::Labels;

// =============================================================================
// View types
// =============================================================================

/// A button the toolbar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub label: String,
    pub enabled: bool,
}

impl ActionView {
    pub fn new(label: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            enabled,
        }
    }
}

/// The global search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub value: String,
    pub placeholder: String,
    /// Whether the clear control is shown (search is non-empty).
    pub clearable: bool,
}

/// A removable chip for one active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: String,
    pub label: String,
    /// Formatted value, e.g. `≥18 - ≤30`.
    pub text: String,
}

/// One entry of the advanced filter picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub key: String,
    pub label: String,
    pub applied: bool,
}

impl PickerOption {
    /// Label with the applied marker appended when applicable.
    pub fn display(&self, labels: &Labels) -> String {
        if self.applied {
            format!("{} {}", self.label, labels.applied_suffix)
        } else {
            self.label.clone()
        }
    }
}

/// Chips, picker and editor. Absent when the table has no filters or
/// filtering is disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSection {
    pub chips: Vec<FilterChip>,
    /// Shown while at least one filter is active.
    pub clear_all: Option<ActionView>,
    pub picker_placeholder: String,
    pub picker: Vec<PickerOption>,
    /// Key of the filter picked in the selector.
    pub picked: Option<String>,
    pub editor: Option<FilterEditorView>,
}

/// Panel shown while at least one row is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPanel {
    pub count: usize,
    /// e.g. `2 selected`.
    pub text: String,
    pub edit: ActionView,
    pub delete: ActionView,
}

/// Everything above the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarView {
    pub title: String,
    /// Present when a create modal factory exists.
    pub create: Option<ActionView>,
    pub search: SearchView,
    pub filters: Option<FilterSection>,
    pub selection: Option<SelectionPanel>,
}

// =============================================================================
// Building
// =============================================================================

/// Inputs gathered by the table for one toolbar render.
pub(crate) struct ToolbarInput<'a> {
    pub title: &'a str,
    pub labels: &'a Labels,
    pub global_filter: &'a str,
    pub descriptors: &'a [FilterDescriptor],
    pub filters_enabled: bool,
    pub active: &'a [ActiveFilter],
    pub drafts: &'a FilterState,
    pub picked: Option<&'a str>,
    pub selected: usize,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

pub(crate) fn build(input: ToolbarInput<'_>) -> ToolbarView {
    let labels = input.labels;

    let search = SearchView {
        value: input.global_filter.to_string(),
        placeholder: labels.search_placeholder.clone(),
        clearable: !input.global_filter.is_empty(),
    };

    let filters = (input.filters_enabled && !input.descriptors.is_empty())
        .then(|| filter_section(&input));

    let selection = (input.selected > 0).then(|| SelectionPanel {
        count: input.selected,
        text: format!("{} {}", input.selected, labels.selected_suffix),
        edit: ActionView::new(&labels.edit, input.can_edit && input.selected == 1),
        delete: ActionView::new(&labels.delete, input.can_delete),
    });

    ToolbarView {
        title: input.title.to_string(),
        create: input
            .can_create
            .then(|| ActionView::new(&labels.create, true)),
        search,
        filters,
        selection,
    }
}

fn filter_section(input: &ToolbarInput<'_>) -> FilterSection {
    let labels = input.labels;
    let descriptor = |key: &str| input.descriptors.iter().find(|d| d.key == key);

    let chips = input
        .active
        .iter()
        .map(|filter| FilterChip {
            key: filter.key.clone(),
            label: filter.label.clone(),
            text: format_chip(filter, descriptor(&filter.key), labels),
        })
        .collect();

    let picker = input
        .descriptors
        .iter()
        .map(|d| PickerOption {
            key: d.key.clone(),
            label: d.label.clone(),
            applied: input.active.iter().any(|f| f.key == d.key),
        })
        .collect();

    let editor = input.picked.and_then(descriptor).and_then(|d| {
        let active = input.active.iter().find(|f| f.key == d.key);
        editor_view(d, active, input.drafts, labels)
    });

    FilterSection {
        chips,
        clear_all: (!input.active.is_empty()).then(|| ActionView::new(&labels.clear_all, true)),
        picker_placeholder: labels.pick_filter.clone(),
        picker,
        picked: input.picked.map(str::to_string),
        editor,
    }
}
