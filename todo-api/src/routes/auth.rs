/// Authentication endpoints
///
/// - `POST /signup` - Register a new user
/// - `POST /login` - Verify credentials and start a session
/// - `POST /logout` - Revoke the current session
///
/// Login returns the session token in the body and also sets it as an
/// `HttpOnly` cookie; either carrier is accepted on later requests.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::DataResponse,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (strength-checked)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address or external ID
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    /// Password
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// Public identifier
    pub external_id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            external_id: user.external_id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token (send as `Authorization: Bearer <token>`)
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}

/// Register a new user
///
/// ```text
/// POST /signup
/// { "name": "Jane", "email": "jane@example.com", "password": "Sup3r$ecret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let Json(req) = payload?;
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .users
        .create_user(CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, external_id = %user.external_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(user))),
    ))
}

/// Log in and start a session
///
/// ```text
/// POST /login
/// { "identifier": "jane@example.com", "password": "Sup3r$ecret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `401 Unauthorized`: Invalid credentials
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;

    let issued = state
        .authenticator
        .authenticate(&req.identifier, &req.password)
        .await?;

    let cookie = session_cookie(&state, &issued.token)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(DataResponse::new(LoginResponse {
            token: issued.token,
            user: UserResponse::from(issued.user),
        })),
    ))
}

/// Revoke the current session
///
/// # Errors
///
/// - `401 Unauthorized`: No live session
/// - `500 Internal Server Error`: Server error
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<impl IntoResponse> {
    state.authenticator.revoke(&auth.token_hash).await?;

    tracing::info!(user_id = auth.user_id(), "User logged out");

    let cookie = expired_cookie(&state)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

fn session_cookie(state: &AppState, token: &str) -> ApiResult<HeaderValue> {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        state.cookie_name(),
        token
    );
    if state.config.session.cookie_secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid session cookie: {}", e)))
}

fn expired_cookie(state: &AppState) -> ApiResult<HeaderValue> {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        state.cookie_name()
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid session cookie: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let req = SignupRequest {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_user_response_has_no_hash() {
        let user = User {
            id: 1,
            external_id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("\"id\""));
    }
}
