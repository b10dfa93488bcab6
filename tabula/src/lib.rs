//! Headless tabular data manager.
//!
//! A [`DataTable`] renders a caller-owned record collection with
//! filtering, global search, sorting, pagination, row selection and
//! modal-driven create/edit/delete. The caller keeps the data, the active
//! filters and the search string in [`State`] handles and reacts to the
//! table's [`TableHandlers`] callbacks.

pub mod column;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod labels;
pub mod modal;
pub mod node;
pub mod pagination;
pub mod search;
pub mod selection;
pub mod sort;
pub mod state;
pub mod table;
pub mod toolbar;
pub mod value;

pub use column::{Column, Record};
pub use error::TableError;
pub use filter::{ActiveFilter, FilterDescriptor, FilterKind, FilterValue, SelectOption};
pub use handlers::TableHandlers;
pub use modal::{Completion, ModalContents, ModalKind};
pub use node::Node;
pub use state::State;
pub use table::{DataTable, EventResult, TableEvent, TableProps, TableView};
pub use value::Value;

pub mod prelude {
    pub use crate::column::{Column, EMPTY_CELL, Record, SELECT_COLUMN_ID};
    pub use crate::error::TableError;
    pub use crate::filter::{
        ActiveFilter, FilterDescriptor, FilterKind, FilterKindTag, FilterState, FilterValue,
        SelectOption, format_chip,
    };
    pub use crate::handlers::TableHandlers;
    pub use crate::labels::Labels;
    pub use crate::modal::{Completion, ModalContents, ModalKind, ModalView};
    pub use crate::node::{Content, Node};
    pub use crate::pagination::{PAGE_SIZE_OPTIONS, Pagination};
    pub use crate::search::SearchMode;
    pub use crate::selection::PageSelection;
    pub use crate::sort::{Direction, SortSpec};
    pub use crate::state::State;
    pub use crate::table::{
        DataTable, EmptyKind, EventResult, TableEvent, TableProps, TableView,
    };
    pub use crate::toolbar::{ApplyPolicy, EditorControl, ToolbarView};
    pub use crate::value::Value;
}
