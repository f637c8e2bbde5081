/// Credential verification and session issuance
///
/// [`Authenticator::authenticate`] looks the user up by email or external ID,
/// compares Argon2 digests and, on success, persists a new session and hands
/// back the plaintext token. Unknown identifiers and wrong passwords fail
/// identically with [`AuthError::InvalidCredentials`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use todo_shared::auth::{authenticator::Authenticator, password::hash_password};
/// use todo_shared::models::user::CreateUser;
/// use todo_shared::store::{CredentialStore, MemoryStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// store.create_user(CreateUser {
///     name: "Jane".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: hash_password("Sup3r$ecret")?,
/// }).await?;
///
/// let auth = Authenticator::new(store.clone(), store.clone());
/// let issued = auth.authenticate("jane@example.com", "Sup3r$ecret").await?;
/// assert_eq!(issued.token.len(), 64);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use super::password::{self, PasswordError};
use super::token::generate_session_token;
use crate::models::{
    session::{CreateSession, IssuedSession},
    user::User,
};
use crate::store::{CredentialStore, SessionStore, StoreError};

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown identifier or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Stored password hash could not be used
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Verifies credentials and issues sessions
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
}

impl Authenticator {
    /// Creates an authenticator over the given stores
    pub fn new(users: Arc<dyn CredentialStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Looks a user up by external ID when `identifier` parses as a UUID,
    /// by email otherwise
    async fn find_user(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        match Uuid::parse_str(identifier) {
            Ok(external_id) => self.users.find_user_by_external_id(external_id).await,
            Err(_) => self.users.find_user_by_email(identifier).await,
        }
    }

    /// Authenticates `identifier` / `password` and issues a new session
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] for an unknown identifier or a wrong
    ///   password (indistinguishable to the caller)
    /// - [`AuthError::Password`] if the stored hash is corrupt
    /// - [`AuthError::Store`] on storage failure
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        let identifier = identifier.trim();

        let Some(user) = self.find_user(identifier).await? else {
            password::verify_dummy(password);
            debug!("Login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = password::verify_password(password, &user.password_hash).map_err(|e| {
            error!(user_id = user.id, error = %e, "Stored password hash is unusable");
            e
        })?;
        if !valid {
            debug!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let (token, token_hash) = generate_session_token();
        let session = self
            .sessions
            .create_session(CreateSession {
                token_hash,
                user_id: user.id,
            })
            .await?;

        info!(user_id = user.id, session_id = session.id, "Session issued");

        Ok(IssuedSession {
            token,
            session,
            user,
        })
    }

    /// Revokes the session whose token digest is `token_hash`
    ///
    /// Returns false if no such session existed.
    pub async fn revoke(&self, token_hash: &str) -> Result<bool, StoreError> {
        let revoked = self.sessions.delete_session(token_hash).await?;

        if revoked {
            info!("Session revoked");
        }
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::hash_session_token;
    use crate::models::user::CreateUser;
    use crate::store::MemoryStore;

    async fn setup() -> (Arc<MemoryStore>, Authenticator, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: password::hash_password("Al1ce$ecret").unwrap(),
            })
            .await
            .unwrap();
        let auth = Authenticator::new(store.clone(), store.clone());
        (store, auth, user)
    }

    #[tokio::test]
    async fn test_authenticate_by_email_issues_session() {
        let (store, auth, user) = setup().await;

        let issued = auth
            .authenticate("alice@example.com", "Al1ce$ecret")
            .await
            .unwrap();

        assert_eq!(issued.session.user_id, user.id);
        assert_eq!(issued.user, user);
        let stored = store
            .find_session(&hash_session_token(&issued.token))
            .await
            .unwrap();
        assert_eq!(stored, Some(issued.session));
    }

    #[tokio::test]
    async fn test_authenticate_by_external_id() {
        let (_store, auth, user) = setup().await;

        let issued = auth
            .authenticate(&user.external_id.to_string(), "Al1ce$ecret")
            .await
            .unwrap();

        assert_eq!(issued.session.user_id, user.id);
    }

    #[tokio::test]
    async fn test_each_login_gets_a_fresh_token() {
        let (_store, auth, _user) = setup().await;

        let a = auth.authenticate("alice@example.com", "Al1ce$ecret").await.unwrap();
        let b = auth.authenticate("alice@example.com", "Al1ce$ecret").await.unwrap();

        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let (_store, auth, _user) = setup().await;

        let wrong_password = auth
            .authenticate("alice@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_user = auth
            .authenticate("nobody@example.com", "Al1ce$ecret")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_revoke() {
        let (store, auth, _user) = setup().await;
        let issued = auth.authenticate("alice@example.com", "Al1ce$ecret").await.unwrap();

        let token_hash = hash_session_token(&issued.token);
        assert!(auth.revoke(&token_hash).await.unwrap());
        assert!(!auth.revoke(&token_hash).await.unwrap());
        assert!(store
            .find_session(&hash_session_token(&issued.token))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_not_invalid_credentials() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_user(CreateUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password_hash: "$argon2id$invalid".to_string(),
            })
            .await
            .unwrap();
        let auth = Authenticator::new(store.clone(), store.clone());

        let err = auth
            .authenticate("bob@example.com", "B0b$ecret!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Password(_)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_invalid_credentials() {
        let (store, auth, _user) = setup().await;
        store.set_available(false);

        let err = auth
            .authenticate("alice@example.com", "Al1ce$ecret")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }
}
