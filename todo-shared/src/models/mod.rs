/// Database models
///
/// Each model carries its own SQL as associated functions taking a `PgPool`.
/// Application code reaches them through the [`store`](crate::store) traits
/// rather than calling them directly.
///
/// # Models
///
/// - `user`: Credential records
/// - `session`: Login sessions (token digests)
/// - `task`: To-do items owned by a user

pub mod session;
pub mod task;
pub mod user;
