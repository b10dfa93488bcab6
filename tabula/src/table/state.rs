//! Table state and the derived row model.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::column::{Column, Record};
use crate::filter::{ActiveFilter, FilterDescriptor, FilterState};
use crate::handlers::TableHandlers;
use crate::labels::Labels;
use crate::modal::{ModalContents, OpenModal};
use crate::pagination::Pagination;
use crate::search::{GlobalSearch, SearchMode};
use crate::selection::Selection;
use crate::sort::{Direction, SortSpec};
use crate::state::State;
use crate::value::Value;

/// Unique identifier for a DataTable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__table_{}", self.0)
    }
}

/// Settings fixed at construction.
pub(super) struct TableConfig<R> {
    pub title: String,
    pub descriptors: Vec<FilterDescriptor>,
    pub modal_contents: ModalContents<R>,
    pub enable_row_selection: bool,
    pub enable_filters: bool,
    pub search_mode: SearchMode,
    pub labels: Labels,
}

/// Versions the cached row model was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RowModelKey {
    data: u64,
    filters: u64,
    search: u64,
    columns: u64,
    sort: SortSpec,
}

#[derive(Debug)]
struct RowModelCache {
    key: RowModelKey,
    indices: Arc<Vec<usize>>,
}

/// Mutable internal state of a table.
#[derive(Debug)]
pub(super) struct TableInner<R: Record> {
    pub sort: SortSpec,
    pub pagination: Pagination,
    pub selection: Selection<R::Key>,
    pub drafts: FilterState,
    /// Filter picked in the advanced selector.
    pub picked: Option<String>,
    pub modal: Option<OpenModal>,
    pub modal_generation: u64,
    /// Active filter keys seen at the last reconciliation.
    seen_filter_keys: Vec<String>,
    seen_filters_version: Option<u64>,
    cache: Option<RowModelCache>,
}

impl<R: Record> TableInner<R> {
    fn new(page_size: usize) -> Self {
        Self {
            sort: SortSpec::none(),
            pagination: Pagination::new(page_size),
            selection: Selection::new(),
            drafts: FilterState::new(),
            picked: None,
            modal: None,
            modal_generation: 0,
            seen_filter_keys: Vec::new(),
            seen_filters_version: None,
            cache: None,
        }
    }

    /// Allocate a generation for a new modal instance.
    pub fn next_modal_generation(&mut self) -> u64 {
        self.modal_generation += 1;
        self.modal_generation
    }
}

/// Shared core behind a [`DataTable`](super::DataTable) handle.
pub(super) struct TableShared<R: Record> {
    pub id: TableId,
    pub config: TableConfig<R>,
    pub columns: State<Vec<Column<R>>>,
    pub data: State<Vec<R>>,
    pub active_filters: State<Vec<ActiveFilter>>,
    pub global_filter: State<String>,
    pub handlers: TableHandlers<R>,
    inner: RwLock<TableInner<R>>,
}

impl<R: Record> TableShared<R> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: TableConfig<R>,
        columns: State<Vec<Column<R>>>,
        page_size: usize,
        data: State<Vec<R>>,
        active_filters: State<Vec<ActiveFilter>>,
        global_filter: State<String>,
        handlers: TableHandlers<R>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: TableId::new(),
            config,
            columns,
            data,
            active_filters,
            global_filter,
            handlers,
            inner: RwLock::new(TableInner::new(page_size)),
        })
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TableInner<R>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TableInner<R>> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn descriptor(&self, key: &str) -> Option<&FilterDescriptor> {
        self.config.descriptors.iter().find(|d| d.key == key)
    }

    // -------------------------------------------------------------------------
    // Draft reconciliation
    // -------------------------------------------------------------------------

    /// Drop drafts of filters the caller removed since the last call, and
    /// every draft once the list went empty.
    pub fn reconcile_drafts(&self) {
        let version = self.active_filters.version();
        if self.read().seen_filters_version == Some(version) {
            return;
        }

        let keys: Vec<String> = self
            .active_filters
            .with(|filters| filters.iter().map(|f| f.key.clone()).collect());

        let mut inner = self.write();
        if keys.is_empty() && !inner.seen_filter_keys.is_empty() {
            log::debug!("{}: active filters emptied, clearing drafts", self.id);
            inner.drafts.clear_all();
        } else {
            let current: HashSet<&String> = keys.iter().collect();
            let removed: Vec<String> = inner
                .seen_filter_keys
                .iter()
                .filter(|k| !current.contains(k))
                .cloned()
                .collect();
            for key in removed {
                inner.drafts.clear(&key);
            }
        }
        inner.seen_filter_keys = keys;
        inner.seen_filters_version = Some(version);
    }

    // -------------------------------------------------------------------------
    // Row model
    // -------------------------------------------------------------------------

    /// Indices into `data` of the filtered, searched and sorted rows.
    ///
    /// Recomputed only when the data, the filters, the search string or the
    /// sort changed since the last call.
    pub fn row_model(&self) -> Arc<Vec<usize>> {
        let key = RowModelKey {
            data: self.data.version(),
            filters: self.active_filters.version(),
            search: self.global_filter.version(),
            columns: self.columns.version(),
            sort: self.read().sort.clone(),
        };

        if let Some(cache) = &self.read().cache {
            if cache.key == key {
                return Arc::clone(&cache.indices);
            }
        }

        let indices = Arc::new(self.compute_rows(&key.sort));
        log::trace!("{}: row model recomputed, {} rows", self.id, indices.len());
        self.write().cache = Some(RowModelCache {
            key,
            indices: Arc::clone(&indices),
        });
        indices
    }

    fn compute_rows(&self, sort: &SortSpec) -> Vec<usize> {
        let filters = self.active_filters.get();
        let query = self.global_filter.get();
        let mut search = GlobalSearch::new(&query, self.config.search_mode);

        self.columns.with(|columns| {
            self.data.with(|rows| {
                let mut indices: Vec<usize> = rows
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| {
                        filters
                            .iter()
                            .all(|f| f.value.matches(&lookup(columns, record, &f.key)))
                    })
                    .filter(|(_, record)| match &mut search {
                        Some(search) => {
                            search.matches(columns.iter().map(|c| c.rendered_text(record)))
                        }
                        None => true,
                    })
                    .map(|(i, _)| i)
                    .collect();

                for (column, direction) in sort.fields().iter().rev() {
                    if !columns.iter().any(|c| &c.id == column) {
                        continue;
                    }
                    let keys: Vec<Value> = indices
                        .iter()
                        .map(|&i| lookup(columns, &rows[i], column))
                        .collect();
                    let mut order: Vec<usize> = (0..indices.len()).collect();
                    order.sort_by(|&a, &b| {
                        let ord = keys[a].sort_cmp(&keys[b]);
                        match direction {
                            Direction::Asc => ord,
                            Direction::Desc => ord.reverse(),
                        }
                    });
                    indices = order.into_iter().map(|o| indices[o]).collect();
                }

                indices
            })
        })
    }

    /// Data indices of the current page, clamping the page index first.
    pub fn page_indices(&self) -> Vec<usize> {
        let rows = self.row_model();
        let mut inner = self.write();
        if inner.pagination.clamp(rows.len()) {
            log::debug!(
                "{}: page index clamped to {}",
                self.id,
                inner.pagination.page_index
            );
        }
        rows[inner.pagination.bounds(rows.len())].to_vec()
    }

    /// Keys of the rows on the current page, in display order.
    pub fn page_keys(&self) -> Vec<R::Key> {
        let page = self.page_indices();
        self.data.with(|data| {
            page.iter()
                .filter_map(|&i| data.get(i).map(Record::key))
                .collect()
        })
    }

    /// Selected records on the current page, in display order.
    pub fn selected_records(&self) -> Vec<R> {
        let page = self.page_indices();
        let inner = self.read();
        self.data.with(|data| {
            page.iter()
                .filter_map(|&i| data.get(i))
                .filter(|record| inner.selection.is_selected(&record.key()))
                .cloned()
                .collect()
        })
    }
}

/// Value a filter or sort on `key` compares against: the column with that
/// id, or the record field of that name.
fn lookup<R: Record>(columns: &[Column<R>], record: &R, key: &str) -> Value {
    match columns.iter().find(|c| c.id == key) {
        Some(column) => column.value(record),
        None => record.field(key),
    }
}
