/// Storage interfaces
///
/// The auth core never touches a connection pool directly. Each component
/// holds the narrow store trait it needs as an `Arc<dyn ...>`, so the same
/// Authenticator, Session Resolver and Authorization Guard run against
/// Postgres in production and against [`MemoryStore`] in tests.
///
/// # Traits
///
/// - [`CredentialStore`]: user records
/// - [`SessionStore`]: session token digests
/// - [`TaskRepository`]: to-do items; performs no ownership checks
/// - [`StorageHealth`]: liveness probe for the health endpoint
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todo_shared::store::{MemoryStore, TaskRepository};
///
/// # async fn example() -> Result<(), todo_shared::store::StoreError> {
/// let store = Arc::new(MemoryStore::new());
/// let tasks: Arc<dyn TaskRepository> = store.clone();
///
/// let task = tasks.create_task(1, "buy milk").await?;
/// assert_eq!(tasks.list_tasks(1).await?, vec![task]);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    session::{CreateSession, Session},
    task::Task,
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend could not be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true for failures of the storage backend itself
    ///
    /// These map to an opaque 500; conflicts are caller errors.
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, StoreError::Conflict(_))
    }
}

/// User credential persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates a user; duplicate email yields [`StoreError::Conflict`]
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Finds a user by internal ID
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Finds a user by email address
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Finds a user by public external ID
    async fn find_user_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>>;
}

/// Session persistence keyed by token digest
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a new session
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session>;

    /// Looks up a session by token digest
    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>>;

    /// Removes a session; returns true if one existed
    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool>;
}

/// Task persistence
///
/// Implementations trust their caller: ownership is enforced by
/// [`AuthorizationGuard`](crate::auth::authorization::AuthorizationGuard), not here.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task owned by `owner_id`
    async fn create_task(&self, owner_id: i64, content: &str) -> StoreResult<Task>;

    /// Lists all tasks of `owner_id`, oldest first; empty when there are none
    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>>;

    /// Finds a task by ID regardless of owner
    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Replaces the task's content
    async fn update_task(&self, task: &Task) -> StoreResult<()>;

    /// Deletes the task
    async fn delete_task(&self, task: &Task) -> StoreResult<()>;
}

/// Storage liveness probe
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Succeeds when the backend answers
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_not_infrastructure() {
        assert!(!StoreError::Conflict("email".to_string()).is_infrastructure());
        assert!(StoreError::Unavailable("down".to_string()).is_infrastructure());
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_infrastructure());
    }
}
