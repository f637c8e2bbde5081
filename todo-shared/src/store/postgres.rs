/// Postgres-backed store
///
/// Thin adapter from the [store traits](super) to the model queries. Unique
/// constraint violations are turned into [`StoreError::Conflict`]; everything
/// else passes through as a database error.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    CredentialStore, SessionStore, StorageHealth, StoreError, StoreResult, TaskRepository,
};
use crate::db::pool::health_check;
use crate::models::{
    session::{CreateSession, Session},
    task::Task,
    user::{CreateUser, User},
};

/// Store implementation over a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations to `Conflict`, keeping the constraint name
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Conflict(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        User::create(&self.pool, data)
            .await
            .map_err(map_unique_violation)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_external_id(&self.pool, external_id).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, data: CreateSession) -> StoreResult<Session> {
        Session::create(&self.pool, data)
            .await
            .map_err(map_unique_violation)
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(Session::find_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<bool> {
        Ok(Session::delete_by_token_hash(&self.pool, token_hash).await?)
    }
}

#[async_trait]
impl TaskRepository for PgStore {
    async fn create_task(&self, owner_id: i64, content: &str) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, owner_id, content).await?)
    }

    async fn list_tasks(&self, owner_id: i64) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        Task::update(&self.pool, task).await?;
        Ok(())
    }

    async fn delete_task(&self, task: &Task) -> StoreResult<()> {
        Task::delete(&self.pool, task.id).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
