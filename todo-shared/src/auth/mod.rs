/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`token`]: Session token generation and SHA-256 digests
/// - [`authenticator`]: Credential check and session issuance (login/logout)
/// - [`resolver`]: Session token to user resolution
/// - [`authorization`]: Per-task ownership guard
/// - [`middleware`]: Request auth context and token extraction
///
/// # Flow
///
/// ```text
/// POST /login  -> Authenticator::authenticate -> token
/// any /todos   -> extract_session_token -> SessionResolver::resolve -> User
/// /todos/{id}  -> AuthorizationGuard::authorize_item(User, id) -> Task
/// ```

pub mod authenticator;
pub mod authorization;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod token;
