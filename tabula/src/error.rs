//! Table construction errors.

use thiserror::Error;

/// Errors that can occur when building a [`DataTable`](crate::DataTable).
///
/// Interaction never fails; only inconsistent configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("column id '{0}' is used more than once")]
    DuplicateColumn(String),

    #[error("filter key '{0}' is used more than once")]
    DuplicateFilter(String),

    #[error("{0} with an empty id")]
    EmptyKey(&'static str),
}
