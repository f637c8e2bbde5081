/// Task model and database operations
///
/// A task is a single to-do item owned by exactly one user. These queries
/// do not filter by owner: callers go through
/// [`AuthorizationGuard`](crate::auth::authorization::AuthorizationGuard) first.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todos (
///     id BIGSERIAL PRIMARY KEY,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todo_shared::models::task::Task;
/// use todo_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(owner_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let mut task = Task::create(&pool, owner_id, "buy milk").await?;
/// task.content = "buy oat milk".to_string();
/// Task::update(&pool, &task).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// To-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Task ID
    pub id: i64,

    /// Owning user ID, fixed at creation
    pub owner_id: i64,

    /// Free-form text
    pub content: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns true if `user_id` owns this task
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Inserts a task for `owner_id`
    pub async fn create(pool: &PgPool, owner_id: i64, content: &str) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO todos (owner_id, content)
            VALUES ($1, $2)
            RETURNING id, owner_id, content, created_at
            "#,
        )
        .bind(owner_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID regardless of owner
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, content, created_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks of one owner, oldest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, content, created_at
            FROM todos
            WHERE owner_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Writes back `content`; `owner_id` is never part of the update
    pub async fn update(pool: &PgPool, task: &Task) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE todos SET content = $2 WHERE id = $1")
            .bind(task.id)
            .bind(&task.content)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task by ID
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owned_by() {
        let task = Task {
            id: 1,
            owner_id: 42,
            content: "buy milk".to_string(),
            created_at: Utc::now(),
        };

        assert!(task.is_owned_by(42));
        assert!(!task.is_owned_by(43));
    }

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: 3,
            owner_id: 9,
            content: "water plants".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["owner_id"], 9);
        assert_eq!(json["content"], "water plants");
        assert!(json["created_at"].is_string());
    }
}
