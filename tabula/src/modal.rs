//! Modal content factories and their completion handles.
//!
//! The table never knows what a create/edit/delete form looks like. The
//! caller supplies factories that build the modal body, and each factory
//! receives a [`Completion`] to call once the caller-side work (validation,
//! persistence) has succeeded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::node::Node;

/// Which CRUD action a modal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Create,
    Edit,
    Delete,
}

/// Handle passed to modal content, used to report success.
///
/// Calling [`complete`](Self::complete) closes the modal and runs the
/// table's completion contract. Only the first accepted call counts, and a
/// handle whose modal has since been closed or replaced does nothing. Content that
/// fails validation or persistence simply never calls it.
///
/// The records a completion acts on are the ones its factory was given,
/// not whatever is selected when it fires.
pub struct Completion<T> {
    finish: Arc<dyn Fn(T) -> bool + Send + Sync>,
    closed: Arc<AtomicBool>,
}

impl<T> Completion<T> {
    pub(crate) fn new(finish: impl Fn(T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            finish: Arc::new(finish),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Report success with the resulting value.
    ///
    /// Returns `false` when the table refused the completion: the handle
    /// was already used, its modal is gone, or the table was dropped. The
    /// caller's callbacks did not run in that case.
    pub fn complete(&self, value: T) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        let accepted = (self.finish)(value);
        if !accepted {
            self.closed.store(false, Ordering::SeqCst);
        }
        accepted
    }

    /// Check if this handle has already been accepted.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            finish: Arc::clone(&self.finish),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

type CreateFactory<R> = Arc<dyn Fn(Completion<R>) -> Node + Send + Sync>;
type EditFactory<R> = Arc<dyn Fn(&R, Completion<R>) -> Node + Send + Sync>;
type DeleteFactory<R> = Arc<dyn Fn(&[R], Completion<()>) -> Node + Send + Sync>;

/// Caller-supplied factories for the create, edit and delete modals.
///
/// Leaving a factory out hides or disables the matching action, which is
/// how callers gate actions by role.
pub struct ModalContents<R> {
    pub(crate) create: Option<CreateFactory<R>>,
    pub(crate) edit: Option<EditFactory<R>>,
    pub(crate) delete: Option<DeleteFactory<R>>,
}

impl<R> Default for ModalContents<R> {
    fn default() -> Self {
        Self {
            create: None,
            edit: None,
            delete: None,
        }
    }
}

impl<R> Clone for ModalContents<R> {
    fn clone(&self) -> Self {
        Self {
            create: self.create.clone(),
            edit: self.edit.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<R> ModalContents<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body of the create modal. Complete with the created record.
    pub fn create(mut self, f: impl Fn(Completion<R>) -> Node + Send + Sync + 'static) -> Self {
        self.create = Some(Arc::new(f));
        self
    }

    /// Body of the edit modal for the selected record. Complete with the
    /// updated record.
    pub fn edit(mut self, f: impl Fn(&R, Completion<R>) -> Node + Send + Sync + 'static) -> Self {
        self.edit = Some(Arc::new(f));
        self
    }

    /// Body of the delete modal for the selected records. Complete once
    /// the deletion is confirmed.
    pub fn delete(
        mut self,
        f: impl Fn(&[R], Completion<()>) -> Node + Send + Sync + 'static,
    ) -> Self {
        self.delete = Some(Arc::new(f));
        self
    }

    pub fn has(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::Create => self.create.is_some(),
            ModalKind::Edit => self.edit.is_some(),
            ModalKind::Delete => self.delete.is_some(),
        }
    }
}

/// The modal currently shown by the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: String,
    pub content: Node,
}

/// Bookkeeping for the open modal. `generation` ties completions to the
/// modal instance that created them.
#[derive(Debug, Clone)]
pub(crate) struct OpenModal {
    pub generation: u64,
    pub kind: ModalKind,
    pub content: Option<Node>,
}
