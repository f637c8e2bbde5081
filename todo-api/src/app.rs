/// Application state and router builder
///
/// `AppState` carries the auth components and the stores they were built
/// from. All of them share one backing store, injected at construction; the
/// server uses [`PgStore`](todo_shared::store::PgStore), tests use
/// [`MemoryStore`](todo_shared::store::MemoryStore).
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_api::{app::{build_router, AppState}, config::Config};
/// use todo_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = AppState::new(Arc::new(MemoryStore::new()), Config::for_memory());
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::headers::response_headers};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use todo_shared::{
    auth::{
        authenticator::Authenticator,
        authorization::AuthorizationGuard,
        middleware::{extract_session_token, AuthContext},
        resolver::SessionResolver,
    },
    store::{CredentialStore, SessionStore, StorageHealth, TaskRepository},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; every field is an `Arc`
/// or wraps one.
#[derive(Clone)]
pub struct AppState {
    /// Login / logout
    pub authenticator: Authenticator,

    /// Session token to user
    pub resolver: SessionResolver,

    /// Per-task ownership check
    pub guard: AuthorizationGuard,

    /// User records (registration)
    pub users: Arc<dyn CredentialStore>,

    /// Task storage (create and list; item access goes through `guard`)
    pub tasks: Arc<dyn TaskRepository>,

    /// Storage liveness probe
    pub health: Arc<dyn StorageHealth>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires every component to the same store
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: CredentialStore + SessionStore + TaskRepository + StorageHealth + 'static,
    {
        let users: Arc<dyn CredentialStore> = store.clone();
        let sessions: Arc<dyn SessionStore> = store.clone();
        let tasks: Arc<dyn TaskRepository> = store.clone();
        let health: Arc<dyn StorageHealth> = store;

        Self {
            authenticator: Authenticator::new(users.clone(), sessions.clone()),
            resolver: SessionResolver::new(sessions, users.clone()),
            guard: AuthorizationGuard::new(tasks.clone()),
            users,
            tasks,
            health,
            config: Arc::new(config),
        }
    }

    /// Name of the cookie that carries the session token
    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health          # public
/// ├── POST   /signup          # public
/// ├── POST   /login           # public, issues the session
/// ├── POST   /logout          # session required
/// ├── GET    /todos           # session required
/// ├── POST   /todos           # session required
/// ├── GET    /todos/:id       # session + ownership
/// ├── PATCH  /todos/:id       # session + ownership
/// └── DELETE /todos/:id       # session + ownership
/// ```
///
/// The session layer is attached with `route_layer`, so an unsupported
/// method answers 405 before authentication runs.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let session_auth = middleware::from_fn_with_state(state.clone(), session_auth_layer);

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    let session_routes = Router::new()
        .route(
            "/logout",
            post(routes::auth::logout).route_layer(session_auth.clone()),
        )
        .route(
            "/todos",
            get(routes::todos::list_todos)
                .post(routes::todos::create_todo)
                .route_layer(session_auth.clone()),
        )
        .route(
            "/todos/:id",
            get(routes::todos::get_todo)
                .patch(routes::todos::update_todo)
                .delete(routes::todos::delete_todo)
                .route_layer(session_auth),
        );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(middleware::from_fn(response_headers))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session authentication middleware layer
///
/// Resolves the request's session token and injects [`AuthContext`] into
/// request extensions. Rejects with 401 when the token is missing or unknown.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(req.headers(), state.cookie_name());

    let user = state.resolver.resolve(token.as_deref()).await.map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Session rejected");
        e
    })?;

    let auth_context = AuthContext::new(user, token.as_deref().unwrap_or_default());
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_shared::store::MemoryStore;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Arc::new(MemoryStore::new()), Config::for_memory());
        assert_eq!(state.cookie_name(), "todo_session");
    }

    #[tokio::test]
    async fn test_cors_preflight_with_explicit_origins() {
        use axum::{body::Body, http::StatusCode};
        use tower::ServiceExt;

        let mut config = Config::for_memory();
        config.api.cors_origins = vec!["https://todo.example.com".to_string()];
        let app = build_router(AppState::new(Arc::new(MemoryStore::new()), config));

        let preflight = |origin: &'static str| {
            axum::http::Request::builder()
                .method(Method::OPTIONS)
                .uri("/todos")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(preflight("https://todo.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://todo.example.com"
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );

        let response = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
