use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Shared, versioned state handle.
///
/// `State<T>` is how a caller hands controlled values (the dataset, the
/// active filter list, the global search string) to a [`DataTable`]. The
/// table only ever reads through the handle; writes happen in the caller,
/// usually from inside one of the table's callbacks.
///
/// Every write bumps a version counter. The table keys its derived row
/// model on these versions, so an unchanged handle never triggers a
/// recomputation.
///
/// # Example
///
/// ```
/// use tabula::State;
///
/// let search = State::new(String::new());
/// let before = search.version();
///
/// search.set("ana".to_string());
///
/// assert_eq!(search.get(), "ana");
/// assert!(search.version() > before);
/// ```
///
/// [`DataTable`]: crate::DataTable
#[derive(Debug)]
pub struct State<T> {
    inner: Arc<RwLock<T>>,
    version: Arc<AtomicU64>,
}

impl<T> State<T> {
    /// Create a new state with the given value
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
            version: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Set a new value
    pub fn set(&self, value: T) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = value;
            self.version.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Update the value using a closure
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        if let Ok(mut guard) = self.inner.write() {
            f(&mut guard);
            self.version.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Number of writes since creation.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            version: Arc::clone(&self.version),
        }
    }
}

impl<T: Default> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
