//! In-memory collection.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tabula::ModalKind;
use tokio::sync::RwLock;

use super::{BackendError, Collection};
use crate::models::{Entity, Id};
use crate::session::Session;

/// Collection kept in process memory. Ids start at 1.
pub struct MemoryCollection<E> {
    records: RwLock<Vec<E>>,
    next_id: AtomicU64,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> MemoryCollection<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Default for MemoryCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn authorize(
    session: &Session,
    action: ModalKind,
    collection: &'static str,
) -> Result<(), BackendError> {
    if session.can(action) {
        return Ok(());
    }
    log::warn!(
        "{}: {} denied {:?} as {}",
        collection,
        session.user,
        action,
        session.role
    );
    Err(BackendError::Forbidden {
        role: session.role,
        action: match action {
            ModalKind::Create => "create",
            ModalKind::Edit => "edit",
            ModalKind::Delete => "delete",
        },
        collection,
    })
}

fn check_unique<E: Entity>(records: &[E], record: &E) -> Result<(), BackendError> {
    let key = record.unique_key();
    if key.trim().is_empty() {
        return Err(BackendError::Invalid(format!(
            "{} record without an identifying value",
            E::NAME
        )));
    }
    if records
        .iter()
        .any(|r| r.key() != record.key() && r.unique_key() == key)
    {
        return Err(BackendError::Duplicate {
            collection: E::NAME,
            key,
        });
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Collection<E> for MemoryCollection<E> {
    async fn list(&self) -> Result<Vec<E>, BackendError> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, session: &Session, record: E) -> Result<E, BackendError> {
        authorize(session, ModalKind::Create, E::NAME)?;

        let mut records = self.records.write().await;
        // Id 0 never collides with a stored record
        let record = record.with_id(0);
        check_unique(&records, &record)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = record.with_id(id);
        records.push(record.clone());
        log::debug!("{}: created {}", E::NAME, id);
        Ok(record)
    }

    async fn update(&self, session: &Session, record: E) -> Result<E, BackendError> {
        authorize(session, ModalKind::Edit, E::NAME)?;

        let mut records = self.records.write().await;
        let id = record.key();
        let Some(index) = records.iter().position(|r| r.key() == id) else {
            return Err(BackendError::NotFound {
                collection: E::NAME,
                id,
            });
        };
        check_unique(&records, &record)?;

        records[index] = record.clone();
        log::debug!("{}: updated {}", E::NAME, id);
        Ok(record)
    }

    async fn delete(&self, session: &Session, ids: &[Id]) -> Result<usize, BackendError> {
        authorize(session, ModalKind::Delete, E::NAME)?;

        let mut records = self.records.write().await;
        if let Some(&id) = ids.iter().find(|id| !records.iter().any(|r| r.key() == **id)) {
            return Err(BackendError::NotFound {
                collection: E::NAME,
                id,
            });
        }

        let before = records.len();
        records.retain(|r| !ids.contains(&r.key()));
        let removed = before - records.len();
        log::debug!("{}: deleted {} records", E::NAME, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::School;
    use crate::session::Role;

    fn school(name: &str, code: &str) -> School {
        School {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            dean: String::new(),
            email: format!("{}@campus.edu", code.to_lowercase()),
        }
    }

    fn admin() -> Session {
        Session::new("root", Role::Admin)
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let schools = MemoryCollection::<School>::new();

        let first = schools.create(&admin(), school("Engineering", "ENG")).await.unwrap();
        let second = schools.create(&admin(), school("Law", "LAW")).await.unwrap();

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(schools.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_key_is_rejected() {
        let schools = MemoryCollection::<School>::new();
        schools.create(&admin(), school("Engineering", "ENG")).await.unwrap();

        let err = schools
            .create(&admin(), school("Engineering II", "eng"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BackendError::Duplicate {
                collection: "schools",
                key: "eng".to_string()
            }
        );
        assert_eq!(schools.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_own_key() {
        let schools = MemoryCollection::<School>::new();
        let eng = schools.create(&admin(), school("Engineering", "ENG")).await.unwrap();
        let law = schools.create(&admin(), school("Law", "LAW")).await.unwrap();

        let renamed = School {
            name: "School of Engineering".to_string(),
            ..eng.clone()
        };
        assert_eq!(
            schools.update(&admin(), renamed.clone()).await.unwrap(),
            renamed
        );

        let clash = School {
            code: "ENG".to_string(),
            ..law
        };
        assert!(matches!(
            schools.update(&admin(), clash).await,
            Err(BackendError::Duplicate { .. })
        ));

        let missing = School { id: 99, ..eng };
        assert_eq!(
            schools.update(&admin(), missing).await,
            Err(BackendError::NotFound {
                collection: "schools",
                id: 99
            })
        );
    }

    #[tokio::test]
    async fn test_roles_are_enforced() {
        let schools = MemoryCollection::<School>::new();
        let staff = Session::new("maria", Role::Staff);
        let public = Session::new("guest", Role::Public);

        assert!(matches!(
            schools.create(&public, school("Law", "LAW")).await,
            Err(BackendError::Forbidden { role: Role::Public, .. })
        ));

        let law = schools.create(&staff, school("Law", "LAW")).await.unwrap();
        assert_eq!(
            schools.delete(&staff, &[law.id]).await,
            Err(BackendError::Forbidden {
                role: Role::Staff,
                action: "delete",
                collection: "schools"
            })
        );
        assert_eq!(schools.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_all_or_nothing() {
        let schools = MemoryCollection::<School>::new();
        let eng = schools.create(&admin(), school("Engineering", "ENG")).await.unwrap();
        let law = schools.create(&admin(), school("Law", "LAW")).await.unwrap();

        assert!(matches!(
            schools.delete(&admin(), &[eng.id, 42]).await,
            Err(BackendError::NotFound { id: 42, .. })
        ));
        assert_eq!(schools.list().await.unwrap().len(), 2);

        assert_eq!(schools.delete(&admin(), &[eng.id, law.id]).await, Ok(2));
        assert!(schools.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_key_is_invalid() {
        let schools = MemoryCollection::<School>::new();

        assert!(matches!(
            schools.create(&admin(), school("Nameless", " ")).await,
            Err(BackendError::Invalid(_))
        ));
    }
}
