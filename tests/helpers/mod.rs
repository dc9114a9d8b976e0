//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use saasboard_api::{AppState, Stores, build_app};
use saasboard_auth::{Authenticator, PasswordHasher};
use saasboard_core::config::AppConfig;
use saasboard_core::types::{TenantId, UserId};
use saasboard_database::MemoryStore;
use saasboard_entity::{Tenant, User, UserRole};

/// Test application context over the in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting the registry and limiter
    pub state: AppState,
    /// Backing store, for seeding
    pub store: MemoryStore,
    /// Tenant every seeded user belongs to
    pub tenant_id: TenantId,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with the given configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(config, Stores::memory(store.clone()));
        Self::from_parts(state, store)
    }

    /// Create a test application with a custom authenticator
    pub fn with_authenticator(authenticator: Arc<dyn Authenticator>) -> Self {
        let store = MemoryStore::new();
        let state =
            AppState::with_authenticator(test_config(), Stores::memory(store.clone()), authenticator);
        Self::from_parts(state, store)
    }

    fn from_parts(state: AppState, store: MemoryStore) -> Self {
        let tenant = Tenant {
            id: TenantId::new(),
            name: "Test Tenant".to_string(),
            created_at: Utc::now(),
        };
        let tenant_id = tenant.id;
        store.insert_tenant(tenant);

        Self {
            router: build_app(state.clone()),
            state,
            store,
            tenant_id,
        }
    }

    /// Create a test user in the app's tenant
    pub fn create_test_user(&self, email: &str, password: &str, role: UserRole) -> User {
        let hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");
        let user = User {
            id: UserId::new(),
            tenant_id: self.tenant_id,
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hash,
            role,
            created_at: Utc::now(),
        };
        self.store
            .insert_user(user.clone())
            .expect("Failed to create test user");
        user
    }

    /// Issue an access token without going through login
    pub fn token_for(&self, user: &User) -> String {
        self.state
            .jwt_encoder
            .issue(user)
            .expect("Failed to issue token")
            .access_token
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[])
            .await
    }

    /// Make an HTTP request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Open a notification stream and return the live response
    pub async fn open_stream(&self, uri: &str, token: Option<&str>) -> OpenStream {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        OpenStream {
            status: response.status(),
            headers: response.headers().clone(),
            body: response.into_body(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

/// A notification stream still being read.
pub struct OpenStream {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Streaming body
    pub body: Body,
}

impl OpenStream {
    /// Next encoded frame, failing the test after five seconds.
    pub async fn next_frame(&mut self) -> String {
        let frame = tokio::time::timeout(Duration::from_secs(5), self.body.frame())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("Body error");
        let data = frame.into_data().expect("Expected a data frame");
        String::from_utf8(data.to_vec()).expect("Frame is not UTF-8")
    }

    /// JSON payload of the next `data:` frame.
    pub async fn next_event(&mut self) -> Value {
        let frame = self.next_frame().await;
        let payload = frame
            .lines()
            .find_map(|line| line.strip_prefix("data:"))
            .map(str::trim)
            .unwrap_or_else(|| panic!("Not a data frame: {frame:?}"));
        serde_json::from_str(payload).expect("Frame payload is not JSON")
    }
}

/// Default configuration for tests.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.app.environment = "test".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}
