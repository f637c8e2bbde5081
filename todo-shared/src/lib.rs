//! # Todo Shared Library
//!
//! Models, storage and the session authentication core used by the todo API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, sessions, tasks)
//! - `store`: Storage traits with Postgres and in-memory implementations
//! - `auth`: Password hashing, sessions, authentication and authorization
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
