/// Session model and database operations
///
/// A session binds a login token to one user. Only the SHA-256 digest of the
/// token is stored, so a leaked `sessions` table cannot be replayed.
/// Sessions do not expire; they live until revoked by logout.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id BIGSERIAL PRIMARY KEY,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::user::User;

/// Persisted session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Internal row ID
    pub id: i64,

    /// Hex SHA-256 of the session token
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// Owner of the session
    pub user_id: i64,

    /// When the session was issued
    pub created_at: DateTime<Utc>,
}

/// Input for creating a session
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// Hex SHA-256 of the plaintext token
    pub token_hash: String,

    /// User the token authenticates as
    pub user_id: i64,
}

/// A session together with the plaintext token it was issued for
///
/// Only returned by login; the plaintext is not recoverable afterwards.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Plaintext bearer token
    pub token: String,

    /// Stored session row
    pub session: Session,

    /// The user the session authenticates
    pub user: User,
}

impl Session {
    /// Inserts a session row
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id)
            VALUES ($1, $2)
            RETURNING id, token_hash, user_id, created_at
            "#,
        )
        .bind(data.token_hash)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by token digest
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, token_hash, user_id, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session by token digest
    ///
    /// Returns true if a row was removed.
    pub async fn delete_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
