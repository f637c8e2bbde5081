//! Common test utilities for integration tests
//!
//! - An application wired to a fresh in-memory store
//! - Signup / login helpers
//! - Request helpers that drive the router with `oneshot`

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use todo_api::{
    app::{build_router, AppState},
    config::Config,
};
use todo_shared::store::MemoryStore;
use tower::ServiceExt;

/// Password that satisfies the strength rules
pub const PASSWORD: &str = "Sup3r$ecret";

/// Test context holding the router and its backing store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

/// A response with its body already collected
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parses the body as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestContext {
    /// Creates a context with an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = Config::for_memory();
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { store, app, config }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends a request with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Registers a user and returns the signup response
    pub async fn signup(&self, name: &str, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/signup",
            None,
            Some(json!({ "name": name, "email": email, "password": PASSWORD })),
        )
        .await
    }

    /// Logs in and returns the session token
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/login",
                None,
                Some(json!({ "identifier": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text());

        response.json()["data"]["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// Signs up and logs in a fresh user, returning the session token
    pub async fn user(&self, name: &str, email: &str) -> String {
        let response = self.signup(name, email).await;
        assert_eq!(response.status, StatusCode::CREATED, "signup failed: {}", response.text());
        self.login(email).await
    }

    /// Creates a todo as the given session
    pub async fn create_todo(&self, token: &str, content: &str) {
        let response = self
            .request("POST", "/todos", Some(token), Some(json!({ "content": content })))
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    /// Lists the todos visible to the given session
    pub async fn list_todos(&self, token: &str) -> Vec<Value> {
        let response = self.request("GET", "/todos", Some(token), None).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["data"].as_array().cloned().unwrap_or_default()
    }
}
