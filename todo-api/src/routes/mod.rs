/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout
/// - `todos`: Todo CRUD

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod health;
pub mod todos;

/// Success envelope: `{ "data": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// Payload
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wraps `data` in the envelope
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
