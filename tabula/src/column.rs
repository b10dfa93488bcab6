//! Records and column descriptors.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::node::Node;
use crate::value::Value;

/// Placeholder shown by the default cell renderer for empty values.
pub const EMPTY_CELL: &str = "-";

/// Id of the synthetic checkbox column prepended when selection is on.
pub const SELECT_COLUMN_ID: &str = "__select";

// =============================================================================
// Record Trait
// =============================================================================

/// Trait for rows that can be displayed in a [`DataTable`](crate::DataTable).
///
/// # Example
///
/// ```
/// use tabula::{Record, Value};
///
/// #[derive(Clone)]
/// struct Person {
///     id: u32,
///     name: String,
/// }
///
/// impl Record for Person {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn field(&self, name: &str) -> Value {
///         match name {
///             "id" => self.id.into(),
///             "name" => self.name.as_str().into(),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record: Clone + Send + Sync + 'static {
    /// The key type used to identify this record.
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Return the stable, unique key for this record.
    fn key(&self) -> Self::Key;

    /// Look up a field by name. Unknown names return [`Value::Null`].
    fn field(&self, name: &str) -> Value;
}

// =============================================================================
// Column
// =============================================================================

type AccessorFn<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;
type CellFn<R> = Arc<dyn Fn(&R) -> Node + Send + Sync>;

/// How a column reads its value out of a record.
pub enum Accessor<R> {
    /// Read a named field through [`Record::field`].
    Key(String),
    /// Derive the value with a closure.
    Fn(AccessorFn<R>),
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Key(key) => Accessor::Key(key.clone()),
            Accessor::Fn(f) => Accessor::Fn(Arc::clone(f)),
        }
    }
}

/// A table column definition.
pub struct Column<R> {
    /// Unique identifier for this column. Filter keys refer to it.
    pub id: String,
    /// Header text displayed at the top.
    pub header: String,
    /// Whether clicking the header cycles sorting.
    pub sortable: bool,
    accessor: Accessor<R>,
    cell: Option<CellFn<R>>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            sortable: self.sortable,
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<R> Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("custom_cell", &self.cell.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Record> Column<R> {
    /// Create a column reading the record field named `id`.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::Key(id.clone()),
            id,
            header: header.into(),
            sortable: true,
            cell: None,
        }
    }

    /// Read a different record field than the column id.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.accessor = Accessor::Key(name.into());
        self
    }

    /// Derive the column value with a closure.
    pub fn accessor(mut self, f: impl Fn(&R) -> Value + Send + Sync + 'static) -> Self {
        self.accessor = Accessor::Fn(Arc::new(f));
        self
    }

    /// Render cells with a custom closure instead of the value's text.
    pub fn cell(mut self, f: impl Fn(&R) -> Node + Send + Sync + 'static) -> Self {
        self.cell = Some(Arc::new(f));
        self
    }

    /// Set whether this column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Read this column's value from a record.
    pub fn value(&self, record: &R) -> Value {
        match &self.accessor {
            Accessor::Key(key) => record.field(key),
            Accessor::Fn(f) => f(record),
        }
    }

    /// Render the cell for a record.
    pub fn render(&self, record: &R) -> Node {
        match &self.cell {
            Some(cell) => cell(record),
            None => default_cell(&self.value(record)),
        }
    }

    /// Text of the rendered cell, as matched by the global search.
    pub fn rendered_text(&self, record: &R) -> String {
        match &self.cell {
            Some(cell) => cell(record).plain_text(),
            None => self.value(record).to_string(),
        }
    }
}

/// Default cell content: the value's string form or [`EMPTY_CELL`].
pub fn default_cell(value: &Value) -> Node {
    if value.is_empty() {
        Node::text(EMPTY_CELL)
    } else {
        Node::text(value.to_string())
    }
}
