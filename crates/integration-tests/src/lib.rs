//! Shared harness for the HTTP-level tests: the full router wired to the
//! memory store and a JWT verifier, driven in-process with `oneshot`.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::{JwtConfig, JwtIdentityVerifier};
use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use domains::CallerIdentity;
use serde_json::Value;
use services::ContentLimits;
use storage_adapters::MemoryDocumentStore;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON, or a JSON string holding the raw text for non-JSON bodies
    pub body: Value,
}

pub struct TestApp {
    router: Router,
    pub verifier: Arc<JwtIdentityVerifier>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_limits(ContentLimits::default())
    }

    pub fn with_limits(limits: ContentLimits) -> Self {
        let verifier = Arc::new(JwtIdentityVerifier::new(JwtConfig {
            secret: TEST_SECRET.to_vec(),
            issuer: None,
            audience: None,
        }));
        let state = AppState::new(
            Arc::new(MemoryDocumentStore::new()),
            verifier.clone(),
            limits,
        );
        Self { router: router(state, true), verifier }
    }

    /// A valid bearer token for a user called `name`.
    pub fn token(&self, id: &str, name: &str) -> String {
        let identity = CallerIdentity::new(id)
            .with_name(name)
            .with_email(format!("{id}@example.com"));
        self.verifier
            .issue_token(&identity, Duration::hours(1))
            .expect("signing a test token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("building request");
        self.call(request).await
    }

    /// Runs a hand-built request through the router.
    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("reading body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, token, body).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Creates a post and returns its id.
    pub async fn create_post(&self, token: &str, content: &str) -> String {
        let response = self
            .post("/api/posts", Some(token), Some(serde_json::json!({ "content": content })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"]
            .as_str()
            .expect("post id")
            .to_string()
    }
}
