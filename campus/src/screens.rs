//! Admin screens: one data table per collection.
//!
//! A [`Screen`] owns the controlled state of its table (records, active
//! filters, search string), supplies the create/edit/delete modal bodies
//! the session's role allows, and runs the backend call behind each modal
//! before completing it.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tabula::prelude::*;
use thiserror::Error;

use crate::backend::{BackendError, CollectionRef, Store};
use crate::config::CampusConfig;
use crate::console::render;
use crate::forms::{Form, FormError, ValidationResult, delete_view};
use crate::models::{Degree, Dependency, Entity, Id, School, Staff, Subject};
use crate::session::Session;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("no form is open")]
    NoForm,

    #[error("the delete confirmation has no fields")]
    NotAForm,
}

/// Outcome of submitting the open modal.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    /// Stored; the modal closed and the table was refreshed.
    Saved,
    /// Field errors; the modal stays open showing them.
    Invalid(ValidationResult),
    /// The backend refused; the modal stays open showing the reason.
    Rejected(BackendError),
    /// Stored, but the table no longer held the modal the work came from,
    /// so the records were reloaded from the backend instead.
    Reloaded(usize),
}

// =============================================================================
// Pending modal
// =============================================================================

/// Work behind the open modal, waiting for submit.
enum Pending<E> {
    Form {
        form: Form<E>,
        done: Completion<E>,
    },
    Delete {
        records: Vec<E>,
        notice: Option<String>,
        done: Completion<()>,
    },
}

impl<E: Entity> Pending<E> {
    fn view(&self) -> Node {
        match self {
            Pending::Form { form, .. } => form.view(),
            Pending::Delete {
                records, notice, ..
            } => delete_view(records, notice.as_deref()),
        }
    }
}

type Slot<E> = Arc<Mutex<Option<Pending<E>>>>;

fn lock<E>(slot: &Slot<E>) -> MutexGuard<'_, Option<Pending<E>>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Modal factories for what `session` may do. Each factory parks its form
/// in `slot` until the screen submits it.
fn modal_contents<E: Entity>(session: &Session, slot: &Slot<E>) -> ModalContents<E> {
    let mut contents = ModalContents::new();

    if session.can(ModalKind::Create) {
        let slot = Arc::clone(slot);
        contents = contents.create(move |done| {
            let form = Form::create();
            let view = form.view();
            *lock(&slot) = Some(Pending::Form { form, done });
            view
        });
    }

    if session.can(ModalKind::Edit) {
        let slot = Arc::clone(slot);
        contents = contents.edit(move |record: &E, done| {
            let form = Form::edit(record);
            let view = form.view();
            *lock(&slot) = Some(Pending::Form { form, done });
            view
        });
    }

    if session.can(ModalKind::Delete) {
        let slot = Arc::clone(slot);
        contents = contents.delete(move |records: &[E], done| {
            let view = delete_view(records, None);
            *lock(&slot) = Some(Pending::Delete {
                records: records.to_vec(),
                notice: None,
                done,
            });
            view
        });
    }

    contents
}

// =============================================================================
// Screen
// =============================================================================

/// A data table over one collection.
pub struct Screen<E: Entity> {
    table: DataTable<E>,
    data: State<Vec<E>>,
    filters: State<Vec<ActiveFilter>>,
    search: State<String>,
    pending: Slot<E>,
    collection: CollectionRef<E>,
    session: Session,
}

impl<E: Entity> fmt::Debug for Screen<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("name", &E::NAME)
            .field("table", &self.table)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<E: Entity> Screen<E> {
    /// Build the screen. `filters` are restored active filters; entries
    /// the screen no longer offers are dropped. Call
    /// [`reload`](Self::reload) to fetch the records.
    pub fn new(
        collection: CollectionRef<E>,
        session: Session,
        config: &CampusConfig,
        filters: Vec<ActiveFilter>,
    ) -> Result<Self, TableError> {
        let descriptors = E::filters();
        let restored: Vec<ActiveFilter> = filters
            .into_iter()
            .filter(|f| {
                descriptors
                    .iter()
                    .any(|d| d.key == f.key && d.kind.tag() == f.kind())
            })
            .collect();

        let data = State::new(Vec::new());
        let filters = State::new(restored);
        let search = State::new(String::new());
        let pending: Slot<E> = Arc::new(Mutex::new(None));

        let handlers = TableHandlers::new(
            {
                let filters = filters.clone();
                move |next| filters.set(next)
            },
            {
                let search = search.clone();
                move |next| search.set(next)
            },
        )
        .on_create_request({
            let data = data.clone();
            move |record: E| data.update(|rows| rows.push(record))
        })
        .on_edit_request({
            let data = data.clone();
            move |record: E| {
                data.update(|rows| {
                    if let Some(row) = rows.iter_mut().find(|r| r.key() == record.key()) {
                        *row = record;
                    }
                })
            }
        })
        .on_delete_request({
            let data = data.clone();
            move |records: Vec<E>| {
                let ids: Vec<Id> = records.iter().map(Record::key).collect();
                data.update(|rows| rows.retain(|r| !ids.contains(&r.key())))
            }
        });

        let props = TableProps::new(data.clone(), filters.clone(), search.clone())
            .title(E::TITLE)
            .columns(E::columns())
            .filters(descriptors)
            .modal_contents(modal_contents(&session, &pending))
            .page_size(config.page_size)
            .search_mode(config.search_mode)
            .labels(config.labels());
        let table = DataTable::new(props, handlers)?;

        Ok(Self {
            table,
            data,
            filters,
            search,
            pending,
            collection,
            session,
        })
    }

    /// Replace the records with the backend's current list.
    pub async fn reload(&self) -> Result<usize, BackendError> {
        let records = self.collection.list().await?;
        let count = records.len();
        self.data.set(records);
        log::debug!("{}: loaded {} records", E::NAME, count);
        Ok(count)
    }

    pub fn table(&self) -> &DataTable<E> {
        &self.table
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Records currently held by the screen, unfiltered.
    pub fn records(&self) -> Vec<E> {
        self.data.get()
    }

    pub fn search(&self) -> String {
        self.search.get()
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters.get()
    }

    /// Bumped on every change of the active filters.
    pub fn filters_version(&self) -> u64 {
        self.filters.version()
    }

    /// Forward a user interaction to the table.
    pub fn dispatch(&self, event: TableEvent<Id>) -> EventResult {
        let closing = matches!(event, TableEvent::CloseModal);
        let result = self.table.dispatch(event);
        if closing && result.is_consumed() {
            lock(&self.pending).take();
        }
        result
    }

    /// Type into a field of the open create or edit form.
    pub fn set_field(&self, field: &str, value: &str) -> Result<(), ScreenError> {
        if self.table.open_modal().is_none() {
            return Err(ScreenError::NoForm);
        }
        match lock(&self.pending).as_mut() {
            Some(Pending::Form { form, .. }) => Ok(form.set(field, value)?),
            Some(Pending::Delete { .. }) => Err(ScreenError::NotAForm),
            None => Err(ScreenError::NoForm),
        }
    }

    /// Body of the open modal, reflecting everything typed so far.
    pub fn modal_body(&self) -> Option<Node> {
        self.table.open_modal()?;
        lock(&self.pending).as_ref().map(Pending::view)
    }

    /// Validate and store the open modal's work, completing the modal on
    /// success.
    pub async fn submit(&self) -> Result<Submitted, ScreenError> {
        if self.table.open_modal().is_none() {
            lock(&self.pending).take();
            return Err(ScreenError::NoForm);
        }
        let Some(pending) = lock(&self.pending).take() else {
            return Err(ScreenError::NoForm);
        };

        match pending {
            Pending::Form { mut form, done } => {
                let Some(record) = form.record() else {
                    let result = form.validation().clone();
                    log::debug!("{}: form has {} errors", E::NAME, result.errors().len());
                    self.park(Pending::Form { form, done });
                    return Ok(Submitted::Invalid(result));
                };

                let stored = match form.id() {
                    Some(_) => self.collection.update(&self.session, record).await,
                    None => self.collection.create(&self.session, record).await,
                };
                match stored {
                    Ok(record) => self.finish(done.complete(record)).await,
                    Err(err) => {
                        log::warn!("{}: save rejected: {}", E::NAME, err);
                        form.set_notice(err.to_string());
                        self.park(Pending::Form { form, done });
                        Ok(Submitted::Rejected(err))
                    }
                }
            }
            Pending::Delete { records, done, .. } => {
                let ids: Vec<Id> = records.iter().map(Record::key).collect();
                match self.collection.delete(&self.session, &ids).await {
                    Ok(_) => self.finish(done.complete(())).await,
                    Err(err) => {
                        log::warn!("{}: delete rejected: {}", E::NAME, err);
                        self.park(Pending::Delete {
                            records,
                            notice: Some(err.to_string()),
                            done,
                        });
                        Ok(Submitted::Rejected(err))
                    }
                }
            }
        }
    }

    /// Outcome of a stored change. A refused completion left the table's
    /// records behind the backend, so they are fetched again.
    async fn finish(&self, accepted: bool) -> Result<Submitted, ScreenError> {
        if accepted {
            return Ok(Submitted::Saved);
        }
        log::warn!("{}: completion refused after saving, reloading", E::NAME);
        Ok(Submitted::Reloaded(self.reload().await?))
    }

    /// Put unfinished work back unless another modal replaced it meanwhile.
    fn park(&self, pending: Pending<E>) {
        let mut slot = lock(&self.pending);
        if slot.is_none() {
            *slot = Some(pending);
        }
    }
}

// =============================================================================
// Screen registry
// =============================================================================

/// The collections the console can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Schools,
    Degrees,
    Subjects,
    Staff,
    Dependencies,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 5] = [
        ScreenKind::Schools,
        ScreenKind::Degrees,
        ScreenKind::Subjects,
        ScreenKind::Staff,
        ScreenKind::Dependencies,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScreenKind::Schools => School::NAME,
            ScreenKind::Degrees => Degree::NAME,
            ScreenKind::Subjects => Subject::NAME,
            ScreenKind::Staff => Staff::NAME,
            ScreenKind::Dependencies => Dependency::NAME,
        }
    }

    /// Build the screen over its collection in `store`.
    pub fn open(
        &self,
        store: &Store,
        session: Session,
        config: &CampusConfig,
        filters: Vec<ActiveFilter>,
    ) -> Result<Box<dyn AnyScreen>, TableError> {
        Ok(match self {
            ScreenKind::Schools => Box::new(Screen::new(
                Arc::clone(&store.schools),
                session,
                config,
                filters,
            )?),
            ScreenKind::Degrees => Box::new(Screen::new(
                Arc::clone(&store.degrees),
                session,
                config,
                filters,
            )?),
            ScreenKind::Subjects => Box::new(Screen::new(
                Arc::clone(&store.subjects),
                session,
                config,
                filters,
            )?),
            ScreenKind::Staff => Box::new(Screen::new(
                Arc::clone(&store.staff),
                session,
                config,
                filters,
            )?),
            ScreenKind::Dependencies => Box::new(Screen::new(
                Arc::clone(&store.dependencies),
                session,
                config,
                filters,
            )?),
        })
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown screen '{0}'")]
pub struct UnknownScreen(pub String);

impl FromStr for ScreenKind {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ScreenKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or(UnknownScreen(name))
    }
}

/// A [`Screen`] with its record type erased, so the console can switch
/// between collections.
#[async_trait]
pub trait AnyScreen: Send + Sync {
    fn name(&self) -> &'static str;

    fn dispatch(&self, event: TableEvent<Id>) -> EventResult;

    fn set_field(&self, field: &str, value: &str) -> Result<(), ScreenError>;

    async fn submit(&self) -> Result<Submitted, ScreenError>;

    async fn reload(&self) -> Result<usize, BackendError>;

    fn active_filters(&self) -> Vec<ActiveFilter>;

    fn filters_version(&self) -> u64;

    /// Plain-text rendering of the table and any open modal.
    fn render(&self, width: usize) -> String;
}

#[async_trait]
impl<E: Entity> AnyScreen for Screen<E> {
    fn name(&self) -> &'static str {
        E::NAME
    }

    fn dispatch(&self, event: TableEvent<Id>) -> EventResult {
        Screen::dispatch(self, event)
    }

    fn set_field(&self, field: &str, value: &str) -> Result<(), ScreenError> {
        Screen::set_field(self, field, value)
    }

    async fn submit(&self) -> Result<Submitted, ScreenError> {
        Screen::submit(self).await
    }

    async fn reload(&self) -> Result<usize, BackendError> {
        Screen::reload(self).await
    }

    fn active_filters(&self) -> Vec<ActiveFilter> {
        Screen::active_filters(self)
    }

    fn filters_version(&self) -> u64 {
        Screen::filters_version(self)
    }

    fn render(&self, width: usize) -> String {
        render::screen(&self.table.render(), self.modal_body().as_ref(), width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collection, MemoryCollection};
    use crate::session::Role;

    fn school(code: &str, name: &str) -> School {
        School {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            dean: String::new(),
            email: format!("{}@campus.edu", code.to_lowercase()),
        }
    }

    async fn seeded(role: Role) -> Screen<School> {
        let collection = Arc::new(MemoryCollection::<School>::new());
        let admin = Session::new("root", Role::Admin);
        for (code, name) in [("ENG", "Engineering"), ("LAW", "Law"), ("MED", "Medicine")] {
            collection.create(&admin, school(code, name)).await.unwrap();
        }

        let screen = Screen::new(
            collection,
            Session::new("user", role),
            &CampusConfig::default(),
            Vec::new(),
        )
        .unwrap();
        screen.reload().await.unwrap();
        screen
    }

    fn name_filter(text: &str) -> ActiveFilter {
        ActiveFilter::new("name", "Name", FilterValue::Text(text.to_string()))
    }

    #[tokio::test]
    async fn test_actions_follow_role() {
        let public = seeded(Role::Public).await;
        let toolbar = public.table().render().toolbar;
        assert!(toolbar.create.is_none());
        assert!(!public.table().can_open(ModalKind::Create));

        let staff = seeded(Role::Staff).await;
        staff.dispatch(TableEvent::ToggleRow(1));
        assert!(staff.table().can_open(ModalKind::Create));
        assert!(staff.table().can_open(ModalKind::Edit));
        assert!(!staff.table().can_open(ModalKind::Delete));

        let admin = seeded(Role::Admin).await;
        admin.dispatch(TableEvent::ToggleRow(1));
        assert!(admin.table().can_open(ModalKind::Delete));
    }

    #[tokio::test]
    async fn test_create_flow() {
        let screen = seeded(Role::Staff).await;
        screen.filters.set(vec![name_filter("law")]);
        assert_eq!(screen.table().total_rows(), 1);

        assert!(screen.dispatch(TableEvent::OpenCreate).is_consumed());
        screen.set_field("name", "Architecture").unwrap();
        screen.set_field("code", "arq").unwrap();
        screen.set_field("email", "arq@campus.edu").unwrap();

        assert_eq!(screen.submit().await.unwrap(), Submitted::Saved);

        assert_eq!(screen.table().open_modal(), None);
        assert!(screen.active_filters().is_empty());
        assert_eq!(screen.table().total_rows(), 4);
        let created = screen.records().pop().unwrap();
        assert_eq!((created.id, created.code.as_str()), (4, "ARQ"));
        assert!(screen.modal_body().is_none());
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let screen = seeded(Role::Admin).await;
        screen.dispatch(TableEvent::OpenCreate);
        screen.set_field("name", "Architecture").unwrap();
        screen.set_field("email", "nope").unwrap();

        let Submitted::Invalid(result) = screen.submit().await.unwrap() else {
            panic!("expected validation errors");
        };

        assert_eq!(result.errors().len(), 2);
        assert_eq!(screen.table().open_modal(), Some(ModalKind::Create));
        let body = screen.modal_body().unwrap().plain_text();
        assert!(body.contains("! Code is required"));
        assert_eq!(screen.records().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_is_shown_on_form() {
        let screen = seeded(Role::Admin).await;
        screen.dispatch(TableEvent::OpenCreate);
        screen.set_field("name", "Law II").unwrap();
        screen.set_field("code", "law").unwrap();
        screen.set_field("email", "law2@campus.edu").unwrap();

        let outcome = screen.submit().await.unwrap();

        assert!(matches!(
            outcome,
            Submitted::Rejected(BackendError::Duplicate { .. })
        ));
        assert_eq!(screen.table().open_modal(), Some(ModalKind::Create));
        let body = screen.modal_body().unwrap().plain_text();
        assert!(body.contains("already exists"));
    }

    #[tokio::test]
    async fn test_edit_flow() {
        let screen = seeded(Role::Staff).await;
        screen.dispatch(TableEvent::ToggleRow(2));
        assert!(screen.dispatch(TableEvent::OpenEdit).is_consumed());

        screen.set_field("dean", "Dr. Ortega").unwrap();
        assert_eq!(screen.submit().await.unwrap(), Submitted::Saved);

        let law = screen.records().into_iter().find(|s| s.id == 2).unwrap();
        assert_eq!(law.dean, "Dr. Ortega");
        assert_eq!(screen.table().selected_count(), 0);
        assert_eq!(screen.records().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let screen = seeded(Role::Admin).await;
        screen.dispatch(TableEvent::ToggleRow(1));
        screen.dispatch(TableEvent::ToggleRow(3));
        screen.dispatch(TableEvent::OpenDelete);

        let body = screen.modal_body().unwrap().plain_text();
        assert!(body.contains("Delete 2 schools?"));
        assert_eq!(
            screen.set_field("name", "x").unwrap_err().to_string(),
            "the delete confirmation has no fields"
        );

        assert_eq!(screen.submit().await.unwrap(), Submitted::Saved);
        let names: Vec<String> = screen.records().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Law"]);
    }

    #[tokio::test]
    async fn test_delete_open_keeps_selection() {
        let collection = Arc::new(MemoryCollection::<School>::new());
        let admin = Session::new("root", Role::Admin);
        for (code, name) in [("ENG", "Engineering"), ("LAW", "Law"), ("MED", "Medicine")] {
            collection.create(&admin, school(code, name)).await.unwrap();
        }
        let screen = Screen::new(
            collection.clone(),
            admin,
            &CampusConfig::default(),
            Vec::new(),
        )
        .unwrap();
        screen.reload().await.unwrap();

        screen.dispatch(TableEvent::ToggleRow(1));
        screen.dispatch(TableEvent::OpenDelete);
        assert_eq!(
            screen.dispatch(TableEvent::ToggleRow(3)),
            EventResult::Ignored
        );
        assert_eq!(
            screen.dispatch(TableEvent::SearchInput("law".to_string())),
            EventResult::Ignored
        );

        assert_eq!(screen.submit().await.unwrap(), Submitted::Saved);

        let local: Vec<Id> = screen.records().iter().map(|s| s.id).collect();
        let stored: Vec<Id> = collection.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(local, vec![2, 3]);
        assert_eq!(local, stored);
    }

    /// Collection that closes the screen's modal while a delete is in
    /// flight, as a second user interaction would.
    struct ClosingCollection {
        inner: MemoryCollection<School>,
        table: Mutex<Option<DataTable<School>>>,
    }

    #[async_trait]
    impl Collection<School> for ClosingCollection {
        async fn list(&self) -> Result<Vec<School>, BackendError> {
            self.inner.list().await
        }

        async fn create(&self, session: &Session, record: School) -> Result<School, BackendError> {
            self.inner.create(session, record).await
        }

        async fn update(&self, session: &Session, record: School) -> Result<School, BackendError> {
            self.inner.update(session, record).await
        }

        async fn delete(&self, session: &Session, ids: &[Id]) -> Result<usize, BackendError> {
            let table = self.table.lock().unwrap().clone();
            if let Some(table) = table {
                table.close_modal();
            }
            self.inner.delete(session, ids).await
        }
    }

    #[tokio::test]
    async fn test_refused_completion_reloads() {
        let admin = Session::new("root", Role::Admin);
        let collection = Arc::new(ClosingCollection {
            inner: MemoryCollection::new(),
            table: Mutex::new(None),
        });
        for (code, name) in [("ENG", "Engineering"), ("LAW", "Law"), ("MED", "Medicine")] {
            collection.create(&admin, school(code, name)).await.unwrap();
        }
        let screen = Screen::new(
            collection.clone(),
            admin,
            &CampusConfig::default(),
            Vec::new(),
        )
        .unwrap();
        *collection.table.lock().unwrap() = Some(screen.table().clone());
        screen.reload().await.unwrap();

        screen.dispatch(TableEvent::ToggleRow(1));
        screen.dispatch(TableEvent::OpenDelete);

        assert_eq!(screen.submit().await.unwrap(), Submitted::Reloaded(2));
        let names: Vec<String> = screen.records().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Law", "Medicine"]);
        assert_eq!(screen.table().open_modal(), None);
    }

    #[tokio::test]
    async fn test_cancel_discards_form() {
        let screen = seeded(Role::Admin).await;
        screen.dispatch(TableEvent::OpenCreate);
        screen.set_field("name", "Architecture").unwrap();

        assert!(screen.dispatch(TableEvent::CloseModal).is_consumed());

        assert!(screen.modal_body().is_none());
        assert!(matches!(screen.submit().await, Err(ScreenError::NoForm)));
        assert!(matches!(
            screen.set_field("name", "x"),
            Err(ScreenError::NoForm)
        ));
    }

    #[tokio::test]
    async fn test_restored_filters_are_checked() {
        let collection = Arc::new(MemoryCollection::<School>::new());
        let stale = ActiveFilter::new("budget", "Budget", FilterValue::Number(3.0));
        let wrong_kind = ActiveFilter::new("code", "Code", FilterValue::Number(1.0));

        let screen = Screen::new(
            collection,
            Session::new("user", Role::Public),
            &CampusConfig::default(),
            vec![stale, name_filter("eng"), wrong_kind],
        )
        .unwrap();

        assert_eq!(screen.active_filters(), vec![name_filter("eng")]);
    }

    #[test]
    fn test_screen_names() {
        assert_eq!("Staff".parse::<ScreenKind>(), Ok(ScreenKind::Staff));
        assert_eq!(
            "rooms".parse::<ScreenKind>(),
            Err(UnknownScreen("rooms".to_string()))
        );
        let names: Vec<&str> = ScreenKind::ALL.iter().map(ScreenKind::name).collect();
        assert_eq!(
            names,
            vec!["schools", "degrees", "subjects", "staff", "dependencies"]
        );
    }
}
