//! The tabular data manager.
//!
//! A [`DataTable`] composes the filtered → sorted → paginated row model
//! over caller-owned data, keeps sort, selection, pagination and filter
//! drafts to itself, and reports every change the caller owns (active
//! filters, search string, CRUD results) through [`TableHandlers`].

mod events;
mod render;
mod state;

pub use events::{EventResult, TableEvent};
pub use render::{
    ColumnView, EmptyKind, EmptyState, PageSizeView, PaginationView, RowView, TableView,
};

use std::collections::HashSet;
use std::sync::Arc;

use crate::column::{Column, Record, SELECT_COLUMN_ID};
use crate::error::TableError;
use crate::filter::{ActiveFilter, FilterDescriptor, FilterState};
use crate::handlers::TableHandlers;
use crate::labels::Labels;
use crate::modal::{ModalContents, ModalKind};
use crate::pagination::Pagination;
use crate::search::SearchMode;
use crate::sort::SortSpec;
use crate::state::State;

use state::{TableConfig, TableShared};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// =============================================================================
// Props
// =============================================================================

/// Inputs of a [`DataTable`].
///
/// `data`, `active_filters` and `global_filter` are controlled: the table
/// reads them through their handles and never writes them.
pub struct TableProps<R: Record> {
    title: String,
    columns: Vec<Column<R>>,
    filters: Vec<FilterDescriptor>,
    modal_contents: ModalContents<R>,
    page_size: usize,
    enable_row_selection: bool,
    enable_filters: bool,
    search_mode: SearchMode,
    labels: Labels,
    data: State<Vec<R>>,
    active_filters: State<Vec<ActiveFilter>>,
    global_filter: State<String>,
}

impl<R: Record> TableProps<R> {
    pub fn new(
        data: State<Vec<R>>,
        active_filters: State<Vec<ActiveFilter>>,
        global_filter: State<String>,
    ) -> Self {
        Self {
            title: String::new(),
            columns: Vec::new(),
            filters: Vec::new(),
            modal_contents: ModalContents::new(),
            page_size: DEFAULT_PAGE_SIZE,
            enable_row_selection: true,
            enable_filters: true,
            search_mode: SearchMode::default(),
            labels: Labels::default(),
            data,
            active_filters,
            global_filter,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<R>>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    pub fn column(mut self, column: Column<R>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = FilterDescriptor>) -> Self {
        self.filters = filters.into_iter().collect();
        self
    }

    pub fn filter(mut self, filter: FilterDescriptor) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn modal_contents(mut self, contents: ModalContents<R>) -> Self {
        self.modal_contents = contents;
        self
    }

    /// Initial page size. Accepted even when it is not one of the picker
    /// presets.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Off: no checkbox column, edit and delete unavailable.
    pub fn enable_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    /// Off: the toolbar's filter section is suppressed. Search stays.
    pub fn enable_filters(mut self, enabled: bool) -> Self {
        self.enable_filters = enabled;
        self
    }

    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }
}

fn check_columns<R>(columns: &[Column<R>]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.id.is_empty() {
            return Err(TableError::EmptyKey("column"));
        }
        if column.id == SELECT_COLUMN_ID || !seen.insert(column.id.as_str()) {
            return Err(TableError::DuplicateColumn(column.id.clone()));
        }
    }
    Ok(())
}

fn check_filters(filters: &[FilterDescriptor]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for filter in filters {
        if filter.key.is_empty() {
            return Err(TableError::EmptyKey("filter"));
        }
        if !seen.insert(filter.key.as_str()) {
            return Err(TableError::DuplicateFilter(filter.key.clone()));
        }
    }
    Ok(())
}

// =============================================================================
// DataTable
// =============================================================================

/// Handle to a table. Cloning shares the same table.
pub struct DataTable<R: Record> {
    shared: Arc<TableShared<R>>,
}

impl<R: Record> Clone for DataTable<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Record> std::fmt::Debug for DataTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.shared.id)
            .field("title", &self.shared.config.title)
            .finish_non_exhaustive()
    }
}

impl<R: Record> DataTable<R> {
    /// Build a table, rejecting inconsistent configuration.
    pub fn new(props: TableProps<R>, handlers: TableHandlers<R>) -> Result<Self, TableError> {
        if props.page_size == 0 {
            return Err(TableError::ZeroPageSize);
        }
        check_columns(&props.columns)?;
        check_filters(&props.filters)?;

        let config = TableConfig {
            title: props.title,
            descriptors: props.filters,
            modal_contents: props.modal_contents,
            enable_row_selection: props.enable_row_selection,
            enable_filters: props.enable_filters,
            search_mode: props.search_mode,
            labels: props.labels,
        };

        let shared = TableShared::new(
            config,
            State::new(props.columns),
            props.page_size,
            props.data,
            props.active_filters,
            props.global_filter,
            handlers,
        );
        log::debug!(
            "{}: created '{}' with page size {}",
            shared.id,
            shared.config.title,
            props.page_size
        );

        Ok(Self { shared })
    }

    fn from_shared(shared: Arc<TableShared<R>>) -> Self {
        Self { shared }
    }

    pub fn title(&self) -> &str {
        &self.shared.config.title
    }

    pub fn labels(&self) -> &Labels {
        &self.shared.config.labels
    }

    /// Replace the column set. Invalidates the cached row model and drops a
    /// sort on a column that no longer exists.
    pub fn set_columns(&self, columns: Vec<Column<R>>) -> Result<(), TableError> {
        check_columns(&columns)?;
        let ids: HashSet<String> = columns.iter().map(|c| c.id.clone()).collect();
        self.shared.columns.set(columns);

        let mut inner = self.shared.write();
        if inner.sort.fields().iter().any(|(id, _)| !ids.contains(id)) {
            inner.sort = SortSpec::none();
        }
        log::debug!("{}: columns replaced", self.shared.id);
        Ok(())
    }

    /// Current sort.
    pub fn sort(&self) -> SortSpec {
        self.shared.read().sort.clone()
    }

    /// Current page position, clamped to the filtered row count.
    pub fn pagination(&self) -> Pagination {
        let total = self.total_rows();
        let mut inner = self.shared.write();
        inner.pagination.clamp(total);
        inner.pagination
    }

    /// Rows left after filtering and search.
    pub fn total_rows(&self) -> usize {
        self.shared.row_model().len()
    }

    pub fn page_count(&self) -> usize {
        let total = self.total_rows();
        self.shared.read().pagination.page_count(total)
    }

    /// Keys of the current page's rows, in display order.
    pub fn page_keys(&self) -> Vec<R::Key> {
        self.shared.page_keys()
    }

    /// Records on the current page, in display order.
    pub fn page_records(&self) -> Vec<R> {
        let page = self.shared.page_indices();
        self.shared
            .data
            .with(|data| page.iter().filter_map(|&i| data.get(i)).cloned().collect())
    }

    /// Selected records on the current page, in display order.
    pub fn selected_records(&self) -> Vec<R> {
        self.shared.selected_records()
    }

    /// Number of selected rows on the current page.
    pub fn selected_count(&self) -> usize {
        self.shared.selected_records().len()
    }

    pub fn is_selected(&self, key: &R::Key) -> bool {
        self.shared.read().selection.is_selected(key)
    }

    /// Snapshot of the filter drafts.
    pub fn drafts(&self) -> FilterState {
        self.shared.reconcile_drafts();
        self.shared.read().drafts.clone()
    }

    /// Key of the filter picked in the advanced selector.
    pub fn picked_filter(&self) -> Option<String> {
        self.shared.read().picked.clone()
    }

    /// Kind of the open modal, if any.
    pub fn open_modal(&self) -> Option<ModalKind> {
        self.shared.read().modal.as_ref().map(|m| m.kind)
    }

    /// Whether the action could be opened right now.
    pub fn can_open(&self, kind: ModalKind) -> bool {
        let config = &self.shared.config;
        if !config.modal_contents.has(kind) {
            return false;
        }
        match kind {
            ModalKind::Create => true,
            ModalKind::Edit => config.enable_row_selection && self.selected_count() == 1,
            ModalKind::Delete => config.enable_row_selection && self.selected_count() >= 1,
        }
    }
}
