use auth_adapters::{JwtConfig, JwtIdentityVerifier};
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use domains::{CallerIdentity, IdentityVerifier};
use integration_tests::{TestApp, TEST_SECRET};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn foreign_token() -> String {
    let other = JwtIdentityVerifier::new(JwtConfig {
        secret: b"some-other-secret".to_vec(),
        ..JwtConfig::default()
    });
    other
        .issue_token(&CallerIdentity::new("eve").with_name("Eve"), Duration::hours(1))
        .unwrap()
}

#[tokio::test]
async fn missing_token_on_required_endpoint_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .post("/api/posts", None, Some(json!({ "content": "hello" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Unauthorized: No token provided.");

    let protected = app.get("/api/protected", None).await;
    assert_eq!(protected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_tokens_are_forbidden_even_where_identity_is_optional() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let id = app.create_post(&alice, "hello").await;

    let expired = app
        .verifier
        .issue_token(&CallerIdentity::new("alice"), Duration::hours(-2))
        .unwrap();
    let tokens = [foreign_token(), expired, "not-a-jwt".to_string()];

    for token in &tokens {
        let required = app
            .post("/api/posts", Some(token), Some(json!({ "content": "x" })))
            .await;
        assert_eq!(required.status, StatusCode::FORBIDDEN);
        assert_eq!(required.body["error"], "Unauthorized: Invalid token.");

        let optional = app.get("/api/posts", Some(token)).await;
        assert_eq!(optional.status, StatusCode::FORBIDDEN);

        let share = app.post(&format!("/api/posts/{id}/share"), Some(token), None).await;
        assert_eq!(share.status, StatusCode::FORBIDDEN);
    }

    let shares = app.get(&format!("/api/posts/{id}"), None).await;
    assert_eq!(shares.body["shareCount"], 0);
}

#[tokio::test]
async fn non_bearer_authorization_counts_as_missing() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/protected")
        .header(AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_echoes_the_verified_caller() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let response = app.get("/api/protected", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "You have access to protected data!");
    assert_eq!(response.body["user"]["id"], "alice");
    assert_eq!(response.body["user"]["name"], "Alice");
    assert_eq!(response.body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn issued_tokens_verify_only_under_the_same_secret() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let identity = assert_ok!(app.verifier.verify_token(&token).await);
    assert_eq!(identity.id, "alice");
    assert_err!(app.verifier.verify_token(&foreign_token()).await);

    let same_secret = JwtIdentityVerifier::new(JwtConfig {
        secret: TEST_SECRET.to_vec(),
        ..JwtConfig::default()
    });
    assert_ok!(same_secret.verify_token(&token).await);
}

#[tokio::test]
async fn liveness_endpoints_answer_without_identity() {
    let app = TestApp::new();

    let root = app.get("/", None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(
        root.body,
        json!("Welcome to the LinkSphere API! It is running correctly.")
    );

    let test = app.get("/api/test", None).await;
    assert_eq!(test.body, json!({ "message": "API is working!" }));
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new();

    let response = app.get("/api/test", None).await;
    let id = response
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn metrics_count_requests_by_route_template() {
    let app = TestApp::new();
    app.get("/api/posts/abc", None).await;
    app.get("/api/posts/def", None).await;

    let response = app.get("/metrics", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let text = response.body.as_str().unwrap();
    assert!(text.contains("linksphere_http_requests_total"));
    assert!(text.contains(r#"route="/api/posts/{id}""#));
    assert!(text.contains(r#"status="404""#));
}
