/// Request-side session plumbing for Axum
///
/// Provides the [`AuthContext`] that authenticated handlers receive via
/// request extensions, and [`extract_session_token`], which reads the token
/// from the request.
///
/// # Token carriers
///
/// 1. `Authorization: Bearer <token>`
/// 2. A cookie named by configuration (for example `todo_session=<token>`)
///
/// The header wins when both are present. Anything else counts as no token.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use todo_shared::auth::middleware::extract_session_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; todo_session=abc123"));
/// assert_eq!(extract_session_token(&headers, "todo_session").as_deref(), Some("abc123"));
/// ```

use axum::http::{header, HeaderMap};

use super::token::hash_session_token;
use crate::models::user::User;

/// Authentication context added to request extensions
///
/// Present only on requests whose session resolved successfully.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user
    pub user: User,

    /// Digest of the presented session token (used by logout)
    pub token_hash: String,
}

impl AuthContext {
    /// Builds a context for `user` authenticated with `token`
    pub fn new(user: User, token: &str) -> Self {
        Self {
            user,
            token_hash: hash_session_token(token),
        }
    }

    /// Internal ID of the authenticated user
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Reads the session token from the request headers
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, cookie_name))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));

        assert_eq!(extract_session_token(&headers, "s").as_deref(), Some("tok"));
    }

    #[test]
    fn test_non_bearer_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(extract_session_token(&headers, "s").is_none());
    }

    #[test]
    fn test_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("a=1; todo_session=tok; b=2"),
        );

        assert_eq!(
            extract_session_token(&headers, "todo_session").as_deref(),
            Some("tok")
        );
        assert!(extract_session_token(&headers, "other").is_none());
    }

    #[test]
    fn test_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("todo_session=tok"));

        assert_eq!(
            extract_session_token(&headers, "todo_session").as_deref(),
            Some("tok")
        );
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(header::COOKIE, HeaderValue::from_static("todo_session=from-cookie"));

        assert_eq!(
            extract_session_token(&headers, "todo_session").as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_empty_values_are_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        headers.insert(header::COOKIE, HeaderValue::from_static("todo_session="));

        assert!(extract_session_token(&headers, "todo_session").is_none());
        assert!(extract_session_token(&HeaderMap::new(), "todo_session").is_none());
    }
}
