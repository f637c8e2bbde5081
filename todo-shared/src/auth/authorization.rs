/// Per-task authorization
///
/// Every single-item operation (read one, update, delete) loads its task
/// through [`AuthorizationGuard::authorize_item`]. The guard is the only place
/// ownership is compared; [`TaskRepository`] implementations do not check it.
///
/// A task owned by someone else is reported exactly like a task that does
/// not exist: [`AuthzError::NotFound`]. There is no "forbidden" outcome, so a
/// caller cannot probe for other users' task IDs.
///
/// # Request flow
///
/// ```text
/// Unauthenticated --resolve--> Authenticated --authorize_item--> Authorized(Task)
///       |                            |
///       +--> 401                     +--> 404 (missing or not owned)
/// ```
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todo_shared::auth::authorization::{AuthorizationGuard, AuthzError};
/// use todo_shared::models::user::CreateUser;
/// use todo_shared::store::{CredentialStore, MemoryStore, TaskRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let owner = store.create_user(CreateUser {
///     name: "Owner".to_string(),
///     email: "owner@example.com".to_string(),
///     password_hash: "hash".to_string(),
/// }).await?;
/// let other = store.create_user(CreateUser {
///     name: "Other".to_string(),
///     email: "other@example.com".to_string(),
///     password_hash: "hash".to_string(),
/// }).await?;
/// let task = store.create_task(owner.id, "buy milk").await?;
///
/// let guard = AuthorizationGuard::new(store.clone());
/// assert_eq!(guard.authorize_item(&owner, task.id).await?, task);
/// assert!(matches!(guard.authorize_item(&other, task.id).await, Err(AuthzError::NotFound)));
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use tracing::debug;

use crate::models::{task::Task, user::User};
use crate::store::{StoreError, TaskRepository};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Task does not exist or is not owned by the caller
    #[error("Not found")]
    NotFound,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Enforces task ownership
#[derive(Clone)]
pub struct AuthorizationGuard {
    tasks: Arc<dyn TaskRepository>,
}

impl AuthorizationGuard {
    /// Creates a guard over the given repository
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Loads `task_id` if and only if `user` owns it
    ///
    /// # Errors
    ///
    /// - [`AuthzError::NotFound`] if the task is missing or owned by another user
    /// - [`AuthzError::Store`] on storage failure
    pub async fn authorize_item(&self, user: &User, task_id: i64) -> Result<Task, AuthzError> {
        let task = self
            .tasks
            .find_task(task_id)
            .await?
            .ok_or(AuthzError::NotFound)?;

        if !task.is_owned_by(user.id) {
            debug!(
                task_id = task_id,
                user_id = user.id,
                "Task owned by another user, reporting not found"
            );
            return Err(AuthzError::NotFound);
        }

        Ok(task)
    }
}
