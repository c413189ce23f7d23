use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn java_query_counts_javascript_across_posts() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    app.create_post(&token, "Loving #javascript and #webdev").await;
    app.create_post(&token, "#javascript is great").await;

    let response = app.get("/api/posts/search/hashtag?q=java", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([{ "name": "javascript", "count": 2 }]));
}

#[tokio::test]
async fn hashtag_search_accepts_a_leading_hash() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    app.create_post(&token, "Loving #javascript").await;

    let response = app.get("/api/posts/search/hashtag?q=%23java", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([{ "name": "javascript", "count": 1 }]));
}

#[tokio::test]
async fn hashtag_search_orders_by_count_then_name() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    app.create_post(&token, "#rustlang #rust #trust").await;
    app.create_post(&token, "#rust again").await;
    app.create_post(&token, "#RUST shouting").await;

    let response = app.get("/api/posts/search/hashtag?q=ru", None).await;
    assert_eq!(
        response.body,
        json!([
            { "name": "rust", "count": 3 },
            { "name": "rustlang", "count": 1 },
            { "name": "trust", "count": 1 },
        ])
    );
}

#[tokio::test]
async fn hashtag_search_caps_results_at_ten() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    let content: String = (0..15).map(|i| format!("#tag{i:02} ")).collect();
    app.create_post(&token, content.trim()).await;

    let response = app.get("/api/posts/search/hashtag?q=tag", None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn short_hashtag_query_is_rejected() {
    let app = TestApp::new();

    for uri in [
        "/api/posts/search/hashtag?q=j",
        "/api/posts/search/hashtag?q=",
        "/api/posts/search/hashtag",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(response.body["error"].is_string());
    }
}

#[tokio::test]
async fn posts_by_hashtag_match_whole_tags_only() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let java = app.create_post(&alice, "Plain old #Java").await;
    app.create_post(&alice, "Only #javascript here").await;
    let newer = app.create_post(&alice, "more #java please").await;

    for uri in ["/api/posts/hashtag/java", "/api/posts/hashtag/%23JAVA"] {
        let response = app.get(uri, Some(&alice)).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        let ids: Vec<_> = response
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, [newer.clone(), java.clone()], "{uri}");
        assert_eq!(response.body[0]["userLiked"], false);
        assert_eq!(response.body[0]["commentCount"], 0);
    }
}
