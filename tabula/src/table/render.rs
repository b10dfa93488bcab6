//! DataTable rendering.
//!
//! [`DataTable::render`] turns the current state into a [`TableView`]: a
//! plain description of everything on screen. Rendering twice without an
//! intervening event or input change yields equal views.

use crate::column::{Record, SELECT_COLUMN_ID};
use crate::modal::{ModalKind, ModalView};
use crate::node::Node;
use crate::pagination::{page_size_options, page_window};
use crate::selection::PageSelection;
use crate::sort::Direction;
use crate::toolbar::{self, ActionView, ToolbarInput, ToolbarView};

use super::DataTable;

// =============================================================================
// View types
// =============================================================================

/// A rendered column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub id: String,
    pub header: String,
    pub sortable: bool,
    pub sort: Option<Direction>,
    /// Select-all checkbox state; set only on the selection column.
    pub checkbox: Option<PageSelection>,
}

impl ColumnView {
    pub fn is_select(&self) -> bool {
        self.id == SELECT_COLUMN_ID
    }
}

/// A rendered row of the current page.
#[derive(Clone)]
pub struct RowView<R: Record> {
    pub key: R::Key,
    pub record: R,
    pub selected: bool,
    /// One node per [`ColumnView`], selection checkbox included.
    pub cells: Vec<Node>,
}

impl<R: Record> std::fmt::Debug for RowView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowView")
            .field("key", &self.key)
            .field("selected", &self.selected)
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}

impl<R: Record> PartialEq for RowView<R> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.selected == other.selected && self.cells == other.cells
    }
}

/// Why the table has no rows to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    /// The dataset itself is empty.
    NoData,
    /// Filters or the global search hide every record.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub kind: EmptyKind,
    pub message: String,
}

/// Page buttons. Only rendered when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page_index: usize,
    pub page_count: usize,
    /// Numbered page buttons, zero-based.
    pub window: Vec<usize>,
    pub previous: ActionView,
    pub next: ActionView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeView {
    pub current: usize,
    pub options: Vec<usize>,
}

/// Everything the table shows.
#[derive(Debug, Clone)]
pub struct TableView<R: Record> {
    pub toolbar: ToolbarView,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView<R>>,
    pub empty: Option<EmptyState>,
    pub pagination: Option<PaginationView>,
    pub page_size: PageSizeView,
    pub modal: Option<ModalView>,
    /// Rows left after filtering and search, across all pages.
    pub total_rows: usize,
}

impl<R: Record> PartialEq for TableView<R> {
    fn eq(&self, other: &Self) -> bool {
        self.toolbar == other.toolbar
            && self.columns == other.columns
            && self.rows == other.rows
            && self.empty == other.empty
            && self.pagination == other.pagination
            && self.page_size == other.page_size
            && self.modal == other.modal
            && self.total_rows == other.total_rows
    }
}

impl<R: Record> TableView<R> {
    /// Row by key, if it is on the current page.
    pub fn row(&self, key: &R::Key) -> Option<&RowView<R>> {
        self.rows.iter().find(|r| &r.key == key)
    }

    /// Keys of the rendered rows, in order.
    pub fn keys(&self) -> Vec<R::Key> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }
}

// =============================================================================
// Rendering
// =============================================================================

impl<R: Record> DataTable<R> {
    /// Render the current state.
    pub fn render(&self) -> TableView<R> {
        let shared = &self.shared;
        let config = &shared.config;
        let labels = &config.labels;

        shared.reconcile_drafts();
        let total = shared.row_model().len();
        let page = shared.page_indices();

        let inner = shared.read();
        let selecting = config.enable_row_selection;

        let (columns, rows) = shared.columns.with(|columns| {
            shared.data.with(|data| {
                let records: Vec<&R> = page.iter().filter_map(|&i| data.get(i)).collect();
                let keys: Vec<R::Key> = records.iter().map(|r| r.key()).collect();
                let page_state = inner.selection.page_state(&keys);

                let mut views = Vec::with_capacity(columns.len() + 1);
                if selecting {
                    views.push(ColumnView {
                        id: SELECT_COLUMN_ID.to_string(),
                        header: String::new(),
                        sortable: false,
                        sort: None,
                        checkbox: Some(page_state),
                    });
                }
                views.extend(columns.iter().map(|c| ColumnView {
                    id: c.id.clone(),
                    header: c.header.clone(),
                    sortable: c.sortable,
                    sort: inner.sort.direction(&c.id),
                    checkbox: None,
                }));

                let rows = records
                    .into_iter()
                    .map(|record| {
                        let key = record.key();
                        let selected = selecting && inner.selection.is_selected(&key);
                        let mut cells = Vec::with_capacity(views.len());
                        if selecting {
                            cells.push(Node::checkbox(selected));
                        }
                        cells.extend(columns.iter().map(|c| c.render(record)));
                        RowView {
                            key,
                            record: record.clone(),
                            selected,
                            cells,
                        }
                    })
                    .collect::<Vec<_>>();

                (views, rows)
            })
        });

        let selected = rows.iter().filter(|r| r.selected).count();
        let active = shared.active_filters.get();
        let global = shared.global_filter.get();

        let toolbar = toolbar::build(ToolbarInput {
            title: &config.title,
            labels,
            global_filter: &global,
            descriptors: &config.descriptors,
            filters_enabled: config.enable_filters,
            active: &active,
            drafts: &inner.drafts,
            picked: inner.picked.as_deref(),
            selected,
            can_create: config.modal_contents.has(ModalKind::Create),
            can_edit: selecting && config.modal_contents.has(ModalKind::Edit),
            can_delete: selecting && config.modal_contents.has(ModalKind::Delete),
        });

        let empty = rows.is_empty().then(|| {
            if !active.is_empty() || !global.is_empty() {
                EmptyState {
                    kind: EmptyKind::NoMatches,
                    message: labels.no_matches.clone(),
                }
            } else {
                EmptyState {
                    kind: EmptyKind::NoData,
                    message: labels.no_data.clone(),
                }
            }
        });

        let pagination = inner.pagination;
        let page_count = pagination.page_count(total);
        let pagination_view = (page_count > 1).then(|| PaginationView {
            page_index: pagination.page_index,
            page_count,
            window: page_window(pagination.page_index, page_count).collect(),
            previous: ActionView::new(&labels.previous, pagination.page_index > 0),
            next: ActionView::new(&labels.next, pagination.page_index + 1 < page_count),
        });

        let modal = inner.modal.as_ref().map(|open| ModalView {
            kind: open.kind,
            title: match open.kind {
                ModalKind::Create => labels.create.clone(),
                ModalKind::Edit => labels.edit.clone(),
                ModalKind::Delete => labels.delete.clone(),
            },
            content: open.content.clone().unwrap_or_else(Node::empty),
        });

        TableView {
            toolbar,
            columns,
            rows,
            empty,
            pagination: pagination_view,
            page_size: PageSizeView {
                current: pagination.page_size,
                options: page_size_options(pagination.page_size),
            },
            modal,
            total_rows: total,
        }
    }
}
