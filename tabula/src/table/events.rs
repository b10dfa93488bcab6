//! Event handling for the DataTable.
//!
//! Every user interaction is a [`TableEvent`]. Handlers update the
//! table's own state and/or call the caller's callbacks; requests that
//! break a contract (unknown column, page out of range, edit with two rows
//! selected...) change nothing and report [`EventResult::Ignored`].
//!
//! While a modal is open it covers the table: only modal events (open,
//! close, completion) are accepted, so the rows a modal was opened for
//! stay selected and visible until it closes.
//!
//! No lock is held while a caller callback or modal factory runs.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::column::Record;
use crate::filter::{ActiveFilter, FilterKind, FilterValue, with_filter, without_filter};
use crate::modal::{Completion, ModalKind, OpenModal};
use crate::node::Node;
use crate::pagination::page_size_options;
use crate::toolbar::{ApplyPolicy, draft_filter, seed_draft};

use super::DataTable;

// =============================================================================
// Event Types
// =============================================================================

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The event changed something or reached the caller.
    Consumed,
    /// The event was rejected and nothing changed.
    Ignored,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

/// A user interaction with the table or its toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<K> {
    /// Header click on a column.
    ToggleSort(String),
    /// Row checkbox.
    ToggleRow(K),
    /// Header checkbox: select or deselect the whole page.
    TogglePageSelection,
    GotoPage(usize),
    PreviousPage,
    NextPage,
    SetPageSize(usize),
    /// New content of the global search box.
    SearchInput(String),
    ClearSearch,
    /// Choose a filter in the advanced selector, or close the editor.
    PickFilter(Option<String>),
    /// Typing into a text or number editor.
    DraftText(String),
    /// Editing a range editor's bounds.
    DraftRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    ApplyDraft,
    ClearDraft,
    /// Choosing a select option. An empty value removes the filter.
    PickOption(String),
    /// Choosing a date. `None` removes the filter.
    PickDate(Option<NaiveDate>),
    /// Chip close button.
    RemoveFilter(String),
    ClearAllFilters,
    OpenCreate,
    OpenEdit,
    OpenDelete,
    CloseModal,
}

impl<R: Record> DataTable<R> {
    /// Route an event to its handler.
    pub fn dispatch(&self, event: TableEvent<R::Key>) -> EventResult {
        match event {
            TableEvent::ToggleSort(column) => self.toggle_sort(&column),
            TableEvent::ToggleRow(key) => self.toggle_row(key),
            TableEvent::TogglePageSelection => self.toggle_page_selection(),
            TableEvent::GotoPage(index) => self.goto_page(index),
            TableEvent::PreviousPage => self.previous_page(),
            TableEvent::NextPage => self.next_page(),
            TableEvent::SetPageSize(size) => self.set_page_size(size),
            TableEvent::SearchInput(text) => self.search_input(text),
            TableEvent::ClearSearch => self.clear_search(),
            TableEvent::PickFilter(key) => self.pick_filter(key),
            TableEvent::DraftText(text) => self.draft_text(text),
            TableEvent::DraftRange { min, max } => self.draft_range(min, max),
            TableEvent::ApplyDraft => self.apply_draft(),
            TableEvent::ClearDraft => self.clear_draft(),
            TableEvent::PickOption(value) => self.pick_option(value),
            TableEvent::PickDate(date) => self.pick_date(date),
            TableEvent::RemoveFilter(key) => self.remove_filter(&key),
            TableEvent::ClearAllFilters => self.clear_all_filters(),
            TableEvent::OpenCreate => self.open_create(),
            TableEvent::OpenEdit => self.open_edit(),
            TableEvent::OpenDelete => self.open_delete(),
            TableEvent::CloseModal => self.close_modal(),
        }
    }

    /// True when an open modal blocks `action` on the table behind it.
    fn blocked(&self, action: &str) -> bool {
        let open = self.shared.read().modal.as_ref().map(|m| m.kind);
        if let Some(kind) = open {
            log::debug!("{}: {} ignored, {:?} modal is open", self.shared.id, action, kind);
        }
        open.is_some()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Cycle the sort of a sortable column: none → asc → desc → none.
    pub fn toggle_sort(&self, column: &str) -> EventResult {
        if self.blocked("sort") {
            return EventResult::Ignored;
        }
        let sortable = self
            .shared
            .columns
            .with(|columns| columns.iter().any(|c| c.id == column && c.sortable));
        if !sortable {
            log::warn!("{}: sort on unknown or unsortable column '{}'", self.shared.id, column);
            return EventResult::Ignored;
        }

        let direction = self.shared.write().sort.toggle(column);
        log::debug!("{}: sort '{}' -> {:?}", self.shared.id, column, direction);
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggle one row of the current page.
    pub fn toggle_row(&self, key: R::Key) -> EventResult {
        if self.blocked("row toggle") {
            return EventResult::Ignored;
        }
        if !self.shared.config.enable_row_selection {
            return EventResult::Ignored;
        }
        if !self.shared.page_keys().contains(&key) {
            log::warn!("{}: row {:?} is not on the current page", self.shared.id, key);
            return EventResult::Ignored;
        }

        let selected = self.shared.write().selection.toggle(key.clone());
        log::debug!("{}: row {:?} selected={}", self.shared.id, key, selected);
        EventResult::Consumed
    }

    /// Select every row of the current page, or deselect them all when
    /// the whole page already is.
    pub fn toggle_page_selection(&self) -> EventResult {
        if self.blocked("page selection") {
            return EventResult::Ignored;
        }
        if !self.shared.config.enable_row_selection {
            return EventResult::Ignored;
        }
        let page = self.shared.page_keys();
        if page.is_empty() {
            return EventResult::Ignored;
        }

        self.shared.write().selection.toggle_page(&page);
        EventResult::Consumed
    }

    fn clear_selection(&self) {
        let mut inner = self.shared.write();
        if !inner.selection.is_empty() {
            log::debug!("{}: selection cleared", self.shared.id);
            inner.selection.clear();
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Jump to a page. Indices outside `0..page_count` are rejected.
    pub fn goto_page(&self, index: usize) -> EventResult {
        if self.blocked("page change") {
            return EventResult::Ignored;
        }
        let total = self.total_rows();
        let mut inner = self.shared.write();
        inner.pagination.clamp(total);
        if !inner.pagination.goto(index, total) {
            return EventResult::Ignored;
        }

        inner.selection.clear();
        log::debug!("{}: page {}", self.shared.id, index);
        EventResult::Consumed
    }

    pub fn previous_page(&self) -> EventResult {
        match self.pagination().page_index.checked_sub(1) {
            Some(index) => self.goto_page(index),
            None => EventResult::Ignored,
        }
    }

    pub fn next_page(&self) -> EventResult {
        self.goto_page(self.pagination().page_index + 1)
    }

    /// Change the page size to one of the picker options. Returns to the
    /// first page.
    pub fn set_page_size(&self, page_size: usize) -> EventResult {
        if self.blocked("page size change") {
            return EventResult::Ignored;
        }
        let mut inner = self.shared.write();
        if !page_size_options(inner.pagination.page_size).contains(&page_size)
            || !inner.pagination.set_page_size(page_size)
        {
            return EventResult::Ignored;
        }

        inner.selection.clear();
        log::debug!("{}: page size {}", self.shared.id, page_size);
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Global search
    // -------------------------------------------------------------------------

    /// Propose a new global search string to the caller.
    pub fn search_input(&self, text: String) -> EventResult {
        if self.blocked("search") {
            return EventResult::Ignored;
        }
        if self.shared.global_filter.with(|current| *current == text) {
            return EventResult::Ignored;
        }

        log::debug!("{}: search '{}'", self.shared.id, text);
        (self.shared.handlers.on_global_filter_change)(text);
        self.clear_selection();
        EventResult::Consumed
    }

    pub fn clear_search(&self) -> EventResult {
        self.search_input(String::new())
    }

    // -------------------------------------------------------------------------
    // Active filters
    // -------------------------------------------------------------------------

    /// Commit a filter: `on_apply_filter`, then `on_filters_change` with the
    /// filter replacing its key's entry or appended.
    ///
    /// Rejected when no descriptor of the same key and kind exists.
    pub fn apply_filter(&self, filter: ActiveFilter) -> EventResult {
        if self.blocked("filter apply") {
            return EventResult::Ignored;
        }
        let known = self
            .shared
            .descriptor(&filter.key)
            .is_some_and(|d| d.kind.tag() == filter.kind());
        if !known {
            log::warn!("{}: no '{}' filter of kind {:?}", self.shared.id, filter.key, filter.kind());
            return EventResult::Ignored;
        }

        log::debug!("{}: apply filter {:?}", self.shared.id, filter);
        let next = self
            .shared
            .active_filters
            .with(|current| with_filter(current, filter.clone()));
        if let Some(on_apply) = &self.shared.handlers.on_apply_filter {
            on_apply(filter);
        }
        (self.shared.handlers.on_filters_change)(next);
        self.clear_selection();
        EventResult::Consumed
    }

    /// Remove one active filter and its draft.
    pub fn remove_filter(&self, key: &str) -> EventResult {
        if self.blocked("filter removal") {
            return EventResult::Ignored;
        }
        let next = self.shared.active_filters.with(|current| {
            current
                .iter()
                .any(|f| f.key == key)
                .then(|| without_filter(current, key))
        });
        let Some(next) = next else {
            return EventResult::Ignored;
        };

        log::debug!("{}: remove filter '{}'", self.shared.id, key);
        self.shared.write().drafts.clear(key);
        if let Some(on_clear) = &self.shared.handlers.on_clear_filter {
            on_clear(key.to_string());
        }
        (self.shared.handlers.on_filters_change)(next);
        self.clear_selection();
        EventResult::Consumed
    }

    /// Remove every active filter and every draft.
    pub fn clear_all_filters(&self) -> EventResult {
        if self.blocked("clear all") {
            return EventResult::Ignored;
        }
        if !self.shared.config.enable_filters
            || self.shared.active_filters.with(|current| current.is_empty())
        {
            return EventResult::Ignored;
        }

        self.reset_filters();
        EventResult::Consumed
    }

    fn reset_filters(&self) {
        log::debug!("{}: clear all filters", self.shared.id);
        {
            let mut inner = self.shared.write();
            inner.drafts.clear_all();
            inner.picked = None;
            inner.selection.clear();
        }
        if let Some(on_clear_all) = &self.shared.handlers.on_clear_all_filters {
            on_clear_all(());
        }
        (self.shared.handlers.on_filters_change)(Vec::new());
    }

    // -------------------------------------------------------------------------
    // Filter editor
    // -------------------------------------------------------------------------

    /// Pick a filter in the advanced selector. Reopening an applied filter
    /// prefills its draft with the applied value.
    pub fn pick_filter(&self, key: Option<String>) -> EventResult {
        if self.blocked("filter pick") {
            return EventResult::Ignored;
        }
        if !self.shared.config.enable_filters {
            return EventResult::Ignored;
        }
        if let Some(key) = &key
            && self.shared.descriptor(key).is_none()
        {
            return EventResult::Ignored;
        }

        self.shared.reconcile_drafts();
        let active = key.as_ref().and_then(|key| {
            self.shared
                .active_filters
                .with(|current| current.iter().find(|f| &f.key == key).cloned())
        });

        let mut inner = self.shared.write();
        if let Some(active) = &active {
            seed_draft(active, &mut inner.drafts);
        }
        log::debug!("{}: picked filter {:?}", self.shared.id, key);
        inner.picked = key;
        EventResult::Consumed
    }

    /// Picked filter's key and kind, when filters are enabled.
    fn picked(&self) -> Option<(String, FilterKind)> {
        if !self.shared.config.enable_filters {
            return None;
        }
        let key = self.shared.read().picked.clone()?;
        let kind = self.shared.descriptor(&key)?.kind.clone();
        Some((key, kind))
    }

    /// Type into the picked text or number editor.
    pub fn draft_text(&self, text: String) -> EventResult {
        if self.blocked("draft edit") {
            return EventResult::Ignored;
        }
        match self.picked() {
            Some((key, FilterKind::Text { .. } | FilterKind::Number { .. })) => {
                self.shared.write().drafts.update_value(&key, text);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Set the bounds of the picked range editor.
    pub fn draft_range(&self, min: Option<f64>, max: Option<f64>) -> EventResult {
        if self.blocked("draft edit") {
            return EventResult::Ignored;
        }
        match self.picked() {
            Some((key, FilterKind::Range { .. })) => {
                self.shared.write().drafts.update_range(&key, min, max);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Apply the picked explicit-apply editor's draft.
    pub fn apply_draft(&self) -> EventResult {
        let Some((key, kind)) = self.picked() else {
            return EventResult::Ignored;
        };
        if ApplyPolicy::for_kind(kind.tag()) != ApplyPolicy::Explicit {
            return EventResult::Ignored;
        }

        self.shared.reconcile_drafts();
        let filter = {
            let inner = self.shared.read();
            self.shared
                .descriptor(&key)
                .and_then(|d| draft_filter(d, &inner.drafts))
        };
        match filter {
            Some(filter) => self.apply_filter(filter),
            None => EventResult::Ignored,
        }
    }

    /// Drop the picked editor's draft, removing its filter when applied.
    pub fn clear_draft(&self) -> EventResult {
        if self.blocked("draft clear") {
            return EventResult::Ignored;
        }
        let Some((key, kind)) = self.picked() else {
            return EventResult::Ignored;
        };
        if ApplyPolicy::for_kind(kind.tag()) != ApplyPolicy::Explicit {
            return EventResult::Ignored;
        }

        self.shared.write().drafts.clear(&key);
        self.remove_filter(&key);
        EventResult::Consumed
    }

    /// Choose an option of the picked select filter. Applies immediately.
    pub fn pick_option(&self, value: String) -> EventResult {
        let Some((key, FilterKind::Select { options })) = self.picked() else {
            return EventResult::Ignored;
        };

        if value.is_empty() {
            return self.remove_filter(&key);
        }
        if !options.iter().any(|o| o.value == value) {
            return EventResult::Ignored;
        }
        let label = self.filter_label(&key);
        self.apply_filter(ActiveFilter::new(key, label, FilterValue::Select(value)))
    }

    /// Choose a date for the picked date filter. Applies immediately.
    pub fn pick_date(&self, date: Option<NaiveDate>) -> EventResult {
        let Some((key, FilterKind::Date)) = self.picked() else {
            return EventResult::Ignored;
        };

        match date {
            Some(date) => {
                let label = self.filter_label(&key);
                self.apply_filter(ActiveFilter::new(
                    key,
                    label,
                    FilterValue::Date(date),
                ))
            }
            None => self.remove_filter(&key),
        }
    }

    fn filter_label(&self, key: &str) -> String {
        self.shared
            .descriptor(key)
            .map(|d| d.label.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Modals
    // -------------------------------------------------------------------------

    /// Register a new modal instance and return its generation.
    fn begin_modal(&self, kind: ModalKind) -> u64 {
        let mut inner = self.shared.write();
        let generation = inner.next_modal_generation();
        inner.modal = Some(OpenModal {
            generation,
            kind,
            content: None,
        });
        log::debug!("{}: open {:?} modal #{}", self.shared.id, kind, generation);
        generation
    }

    fn fill_modal(&self, generation: u64, content: Node) {
        let mut inner = self.shared.write();
        if let Some(modal) = inner.modal.as_mut()
            && modal.generation == generation
        {
            modal.content = Some(content);
        }
    }

    /// Close the modal if it is still the instance `generation` of `kind`.
    fn end_modal(&self, generation: u64, kind: ModalKind) -> bool {
        let mut inner = self.shared.write();
        let current = inner
            .modal
            .as_ref()
            .is_some_and(|m| m.generation == generation && m.kind == kind);
        if current {
            inner.modal = None;
        }
        current
    }

    /// Completion handle that re-enters this table without keeping it alive.
    fn completion<T: 'static>(
        &self,
        finish: impl Fn(&DataTable<R>, T) -> bool + Send + Sync + 'static,
    ) -> Completion<T> {
        let weak = Arc::downgrade(&self.shared);
        Completion::new(move |value| match weak.upgrade() {
            Some(shared) => finish(&DataTable::from_shared(shared), value),
            None => false,
        })
    }

    /// Open the create modal.
    pub fn open_create(&self) -> EventResult {
        let Some(factory) = self.shared.config.modal_contents.create.clone() else {
            return EventResult::Ignored;
        };

        let generation = self.begin_modal(ModalKind::Create);
        let completion =
            self.completion(move |table: &DataTable<R>, record| table.finish_create(generation, record));
        let content = factory(completion);
        self.fill_modal(generation, content);
        EventResult::Consumed
    }

    /// Open the edit modal for the single selected row.
    pub fn open_edit(&self) -> EventResult {
        let Some(factory) = self.shared.config.modal_contents.edit.clone() else {
            return EventResult::Ignored;
        };
        if !self.shared.config.enable_row_selection {
            return EventResult::Ignored;
        }
        let selected = self.selected_records();
        let [record] = selected.as_slice() else {
            log::warn!(
                "{}: edit needs exactly one selected row, have {}",
                self.shared.id,
                selected.len()
            );
            return EventResult::Ignored;
        };

        let generation = self.begin_modal(ModalKind::Edit);
        let key = record.key();
        let completion = self.completion(move |table: &DataTable<R>, updated| {
            table.finish_edit(generation, &key, updated)
        });
        let content = factory(record, completion);
        self.fill_modal(generation, content);
        EventResult::Consumed
    }

    /// Open the delete modal for every selected row.
    pub fn open_delete(&self) -> EventResult {
        let Some(factory) = self.shared.config.modal_contents.delete.clone() else {
            return EventResult::Ignored;
        };
        if !self.shared.config.enable_row_selection {
            return EventResult::Ignored;
        }
        let selected = self.selected_records();
        if selected.is_empty() {
            return EventResult::Ignored;
        }

        let generation = self.begin_modal(ModalKind::Delete);
        let shown = selected.clone();
        let completion = self.completion(move |table: &DataTable<R>, ()| {
            table.finish_delete(generation, shown.clone())
        });
        let content = factory(&selected, completion);
        self.fill_modal(generation, content);
        EventResult::Consumed
    }

    /// Dismiss the open modal without completing it.
    pub fn close_modal(&self) -> EventResult {
        let closed = self.shared.write().modal.take();
        match closed {
            Some(modal) => {
                log::debug!("{}: dismissed {:?} modal", self.shared.id, modal.kind);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Completion contracts
    // -------------------------------------------------------------------------

    fn finish_create(&self, generation: u64, record: R) -> bool {
        if !self.end_modal(generation, ModalKind::Create) {
            log::warn!("{}: stale create completion ignored", self.shared.id);
            return false;
        }

        log::info!("{}: create completed for {:?}", self.shared.id, record.key());
        if let Some(on_create) = &self.shared.handlers.on_create_request {
            on_create(record);
        }
        self.after_mutation();
        true
    }

    /// `key` is the record the modal was opened for.
    fn finish_edit(&self, generation: u64, key: &R::Key, record: R) -> bool {
        if &record.key() != key {
            log::warn!(
                "{}: edit of {:?} completed with record {:?}",
                self.shared.id,
                key,
                record.key()
            );
            return false;
        }
        if !self.end_modal(generation, ModalKind::Edit) {
            log::warn!("{}: stale edit completion ignored", self.shared.id);
            return false;
        }

        log::info!("{}: edit completed for {:?}", self.shared.id, key);
        if let Some(on_edit) = &self.shared.handlers.on_edit_request {
            on_edit(record);
        }
        self.after_mutation();
        true
    }

    /// `records` are the rows the delete modal was opened for.
    fn finish_delete(&self, generation: u64, records: Vec<R>) -> bool {
        if !self.end_modal(generation, ModalKind::Delete) {
            log::warn!("{}: stale delete completion ignored", self.shared.id);
            return false;
        }

        log::info!("{}: delete completed for {} rows", self.shared.id, records.len());
        if let Some(on_delete) = &self.shared.handlers.on_delete_request {
            on_delete(records);
        }
        self.after_mutation();
        true
    }

    /// Selection and every filter are cleared after a CRUD completion.
    fn after_mutation(&self) {
        self.reset_filters();
    }
}
