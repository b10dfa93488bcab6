//! Callbacks from the table to its caller.

use std::sync::Arc;

use crate::column::Record;
use crate::filter::ActiveFilter;

/// A callback receiving one value.
pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Everything the table reports back to its caller.
///
/// The two filter callbacks are required: the caller owns the active
/// filter list and the search string, so without them the user could
/// never change either. The rest are optional hooks.
///
/// # Example
///
/// ```
/// use tabula::{ActiveFilter, State, TableHandlers};
/// # #[derive(Clone)] struct Row;
/// # impl tabula::Record for Row {
/// #     type Key = u32;
/// #     fn key(&self) -> u32 { 0 }
/// #     fn field(&self, _: &str) -> tabula::Value { tabula::Value::Null }
/// # }
///
/// let filters: State<Vec<ActiveFilter>> = State::default();
/// let search: State<String> = State::default();
///
/// let handlers = TableHandlers::<Row>::new(
///     {
///         let filters = filters.clone();
///         move |next| filters.set(next)
///     },
///     {
///         let search = search.clone();
///         move |next| search.set(next)
///     },
/// )
/// .on_delete_request(|rows: Vec<Row>| println!("delete {} rows", rows.len()));
/// ```
pub struct TableHandlers<R: Record> {
    pub(crate) on_filters_change: Callback<Vec<ActiveFilter>>,
    pub(crate) on_global_filter_change: Callback<String>,
    pub(crate) on_apply_filter: Option<Callback<ActiveFilter>>,
    pub(crate) on_clear_filter: Option<Callback<String>>,
    pub(crate) on_clear_all_filters: Option<Callback<()>>,
    pub(crate) on_create_request: Option<Callback<R>>,
    pub(crate) on_edit_request: Option<Callback<R>>,
    pub(crate) on_delete_request: Option<Callback<Vec<R>>>,
}

impl<R: Record> TableHandlers<R> {
    /// Create handlers with the two required callbacks.
    pub fn new(
        on_filters_change: impl Fn(Vec<ActiveFilter>) + Send + Sync + 'static,
        on_global_filter_change: impl Fn(String) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_filters_change: Arc::new(on_filters_change),
            on_global_filter_change: Arc::new(on_global_filter_change),
            on_apply_filter: None,
            on_clear_filter: None,
            on_clear_all_filters: None,
            on_create_request: None,
            on_edit_request: None,
            on_delete_request: None,
        }
    }

    /// Called with the filter just applied, before `on_filters_change`.
    pub fn on_apply_filter(mut self, f: impl Fn(ActiveFilter) + Send + Sync + 'static) -> Self {
        self.on_apply_filter = Some(Arc::new(f));
        self
    }

    /// Called with the key of a removed filter, before `on_filters_change`.
    pub fn on_clear_filter(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_clear_filter = Some(Arc::new(f));
        self
    }

    /// Called when all filters are cleared, before `on_filters_change`.
    pub fn on_clear_all_filters(mut self, f: impl Fn(()) + Send + Sync + 'static) -> Self {
        self.on_clear_all_filters = Some(Arc::new(f));
        self
    }

    /// Called with the record produced by the create modal.
    pub fn on_create_request(mut self, f: impl Fn(R) + Send + Sync + 'static) -> Self {
        self.on_create_request = Some(Arc::new(f));
        self
    }

    /// Called with the record produced by the edit modal.
    pub fn on_edit_request(mut self, f: impl Fn(R) + Send + Sync + 'static) -> Self {
        self.on_edit_request = Some(Arc::new(f));
        self
    }

    /// Called with every selected record once deletion is confirmed.
    pub fn on_delete_request(mut self, f: impl Fn(Vec<R>) + Send + Sync + 'static) -> Self {
        self.on_delete_request = Some(Arc::new(f));
        self
    }
}
