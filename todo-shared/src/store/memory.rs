/// In-memory store
///
/// Implements every store trait over maps behind a single `RwLock`. Used as
/// the test double for the auth core and the HTTP layer, and by the server
/// when started with `STORAGE=memory`.
///
/// The store can be switched offline with [`MemoryStore::set_available`],
/// after which every call fails with [`StoreError::Unavailable`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CredentialStore, SessionStore, StorageHealth, StoreError, StoreResult, TaskRepository,
};
use crate::models::{
    session::{CreateSession, Session},
    task::Task,
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    sessions: HashMap<String, Session>,
    tasks: BTreeMap<i64, Task>,
    next_user_id: i64,
    next_session_id: i64,
    next_task_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Store implementation held entirely in process memory
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the backend going away (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            external_id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        self.check_available()?;
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.external_id == external_id)
            .cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.sessions.contains_key(&data.token_hash) {
            return Err(StoreError::Conflict("sessions_token_hash_key".to_string()));
        }

        let session = Session {
            id: Tables::next_id(&mut tables.next_session_id),
            token_hash: data.token_hash,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());

        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        self.check_available()?;
        Ok(self.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self
            .tables
            .write()
            .await
            .sessions
            .remove(token_hash)
            .is_some())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create_task(&self, owner_id: i64, content: &str) -> StoreResult<Task> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        let task = Task {
            id: Tables::next_id(&mut tables.next_task_id),
            owner_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        self.check_available()?;
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        // Only content is writable; the stored owner is kept.
        if let Some(stored) = tables.tasks.get_mut(&task.id) {
            stored.content = task.content.clone();
        }

        Ok(())
    }

    async fn delete_task(&self, task: &Task) -> StoreResult<()> {
        self.check_available()?;
        self.tables.write().await.tasks.remove(&task.id);
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_external_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("a@example.com")).await.unwrap();
        let b = store.create_user(new_user("b@example.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.external_id, b.external_id);
        assert_eq!(
            store.find_user_by_external_id(b.external_id).await.unwrap(),
            Some(b)
        );
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_ordered() {
        let store = MemoryStore::new();
        let first = store.create_task(1, "first").await.unwrap();
        store.create_task(2, "other owner").await.unwrap();
        let second = store.create_task(1, "second").await.unwrap();

        assert_eq!(store.list_tasks(1).await.unwrap(), vec![first, second]);
        assert!(store.list_tasks(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_owner() {
        let store = MemoryStore::new();
        let task = store.create_task(1, "old").await.unwrap();

        let edited = Task {
            owner_id: 99,
            content: "new".to_string(),
            ..task.clone()
        };
        store.update_task(&edited).await.unwrap();

        let stored = store.find_task(task.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "new");
        assert_eq!(stored.owner_id, 1);
    }

    #[tokio::test]
    async fn test_delete_then_find() {
        let store = MemoryStore::new();
        let task = store.create_task(1, "gone soon").await.unwrap();

        store.delete_task(&task).await.unwrap();
        assert!(store.find_task(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_available(false);

        assert!(matches!(
            store.list_tasks(1).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }
}
