/// Session resolution
///
/// Turns the token carried by a request into the [`User`] it authenticates.
/// Sessions never expire; a token stays valid until it is revoked.

use std::sync::Arc;

use tracing::{debug, warn};

use super::token::hash_session_token;
use crate::models::user::User;
use crate::store::{CredentialStore, SessionStore, StoreError};

/// Error type for session resolution
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Request carried no token
    #[error("Missing session token")]
    MissingToken,

    /// Token is unknown or revoked
    #[error("Invalid session")]
    InvalidSession,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves session tokens to users
#[derive(Clone)]
pub struct SessionResolver {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn CredentialStore>,
}

impl SessionResolver {
    /// Creates a resolver over the given stores
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn CredentialStore>) -> Self {
        Self { sessions, users }
    }

    /// Resolves `token` to the user it was issued for
    ///
    /// # Errors
    ///
    /// - [`SessionError::MissingToken`] if `token` is `None` or blank
    /// - [`SessionError::InvalidSession`] if no live session matches, or the
    ///   session's user no longer exists
    /// - [`SessionError::Store`] on storage failure
    pub async fn resolve(&self, token: Option<&str>) -> Result<User, SessionError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        let session = self
            .sessions
            .find_session(&hash_session_token(token))
            .await?
            .ok_or_else(|| {
                debug!("Session token not found");
                SessionError::InvalidSession
            })?;

        let user = self
            .users
            .find_user_by_id(session.user_id)
            .await?
            .ok_or_else(|| {
                warn!(
                    session_id = session.id,
                    user_id = session.user_id,
                    "Session points at a missing user"
                );
                SessionError::InvalidSession
            })?;

        Ok(user)
    }
}
