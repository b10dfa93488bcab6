//! Record storage behind the admin screens.

mod memory;

pub use memory::MemoryCollection;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Degree, Dependency, Entity, Id, School, Staff, Subject};
use crate::session::{Role, Session};

/// Errors reported by a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{collection}: '{key}' already exists")]
    Duplicate {
        collection: &'static str,
        key: String,
    },

    #[error("{collection}: no record with id {id}")]
    NotFound { collection: &'static str, id: Id },

    #[error("{role} users may not {action} {collection}")]
    Forbidden {
        role: Role,
        action: &'static str,
        collection: &'static str,
    },

    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Async CRUD over one record type.
#[async_trait]
pub trait Collection<E: Entity>: Send + Sync {
    /// Every record, in insertion order.
    async fn list(&self) -> Result<Vec<E>, BackendError>;

    /// Store a new record under a fresh id and return it.
    async fn create(&self, session: &Session, record: E) -> Result<E, BackendError>;

    /// Replace the record with the same id and return the stored value.
    async fn update(&self, session: &Session, record: E) -> Result<E, BackendError>;

    /// Delete every listed record. Fails without deleting anything when
    /// one id is unknown.
    async fn delete(&self, session: &Session, ids: &[Id]) -> Result<usize, BackendError>;
}

/// Shared handle to a collection.
pub type CollectionRef<E> = Arc<dyn Collection<E>>;

/// All collections of the portal.
#[derive(Clone)]
pub struct Store {
    pub schools: CollectionRef<School>,
    pub degrees: CollectionRef<Degree>,
    pub subjects: CollectionRef<Subject>,
    pub staff: CollectionRef<Staff>,
    pub dependencies: CollectionRef<Dependency>,
}

impl Store {
    /// A store keeping everything in memory.
    pub fn in_memory() -> Self {
        Self {
            schools: Arc::new(MemoryCollection::<School>::new()),
            degrees: Arc::new(MemoryCollection::<Degree>::new()),
            subjects: Arc::new(MemoryCollection::<Subject>::new()),
            staff: Arc::new(MemoryCollection::<Staff>::new()),
            dependencies: Arc::new(MemoryCollection::<Dependency>::new()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
