use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;
use services::ContentLimits;

#[tokio::test]
async fn create_post_with_empty_content_is_rejected() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    for body in [json!({}), json!({ "content": "" }), json!({ "content": "   " })] {
        let response = app.post("/api/posts", Some(&token), Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Post content is required.");
    }

    let listed = app.get("/api/posts", None).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn create_post_rejects_content_over_the_limit() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let response = app
        .post("/api/posts", Some(&token), Some(json!({ "content": "x".repeat(281) })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/posts", Some(&token), Some(json!({ "content": "é".repeat(280) })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn created_post_carries_author_and_empty_counters() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let response = app
        .post("/api/posts", Some(&token), Some(json!({ "content": "hello world" })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let post = &response.body;
    assert_eq!(post["content"], "hello world");
    assert_eq!(post["authorId"], "alice");
    assert_eq!(post["authorName"], "Alice");
    assert_eq!(post["likes"], 0);
    assert_eq!(post["userLiked"], false);
    assert_eq!(post["shareCount"], 0);
    assert_eq!(post["commentCount"], 0);
    assert!(post["timestamp"].is_string());
}

#[tokio::test]
async fn feed_is_newest_first_with_comment_counts() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    let first = app.create_post(&token, "first").await;
    let second = app.create_post(&token, "second").await;
    app.post(
        &format!("/api/posts/{first}/comments"),
        Some(&token),
        Some(json!({ "content": "reply" })),
    )
    .await;

    let feed = app.get("/api/posts", None).await;
    assert_eq!(feed.status, StatusCode::OK);
    let posts = feed.body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], second.as_str());
    assert_eq!(posts[1]["id"], first.as_str());
    assert_eq!(posts[1]["commentCount"], 1);
    assert!(posts[0].get("userLiked").is_none());
}

#[tokio::test]
async fn like_count_and_user_liked_follow_the_like_set() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let id = app.create_post(&alice, "like me").await;

    let liked = app.post(&format!("/api/posts/{id}/like"), Some(&bob), None).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.body, json!({ "liked": true, "likes": 1 }));

    let as_bob = app.get(&format!("/api/posts/{id}"), Some(&bob)).await;
    assert_eq!(as_bob.body["likes"], 1);
    assert_eq!(as_bob.body["userLiked"], true);

    let as_alice = app.get(&format!("/api/posts/{id}"), Some(&alice)).await;
    assert_eq!(as_alice.body["likes"], 1);
    assert_eq!(as_alice.body["userLiked"], false);

    let anonymous = app.get(&format!("/api/posts/{id}"), None).await;
    assert_eq!(anonymous.body["likes"], 1);
    assert!(anonymous.body.get("userLiked").is_none());
}

#[tokio::test]
async fn toggling_like_twice_restores_the_count() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let id = app.create_post(&alice, "toggle").await;
    app.post(&format!("/api/posts/{id}/like"), Some(&alice), None).await;

    let before = app.get(&format!("/api/posts/{id}"), None).await.body["likes"].clone();
    let on = app.post(&format!("/api/posts/{id}/like"), Some(&bob), None).await;
    assert_eq!(on.body["likes"], 2);
    let off = app.post(&format!("/api/posts/{id}/like"), Some(&bob), None).await;
    assert_eq!(off.body, json!({ "liked": false, "likes": 1 }));

    let after = app.get(&format!("/api/posts/{id}"), None).await.body["likes"].clone();
    assert_eq!(before, after);
}

#[tokio::test]
async fn like_on_missing_post_is_not_found() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let response = app.post("/api/posts/nope/like", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Post not found.");
}

#[tokio::test]
async fn only_the_author_can_update_or_delete() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let mallory = app.token("mallory", "Mallory");
    let id = app.create_post(&alice, "original").await;

    let update = app
        .put(&format!("/api/posts/{id}"), Some(&mallory), json!({ "content": "defaced" }))
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
    assert_eq!(update.body["error"], "User not authorized to edit this post.");

    let delete = app.delete(&format!("/api/posts/{id}"), Some(&mallory)).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let unchanged = app.get(&format!("/api/posts/{id}"), None).await;
    assert_eq!(unchanged.body["content"], "original");

    let update = app
        .put(&format!("/api/posts/{id}"), Some(&alice), json!({ "content": "edited" }))
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(update.body["message"], "Post updated successfully.");
    let edited = app.get(&format!("/api/posts/{id}"), None).await;
    assert_eq!(edited.body["content"], "edited");

    let delete = app.delete(&format!("/api/posts/{id}"), Some(&alice)).await;
    assert_eq!(delete.status, StatusCode::OK);
    assert_eq!(delete.body["message"], "Post deleted successfully.");
    let gone = app.get(&format!("/api/posts/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_of_missing_post_are_not_found() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let update = app
        .put("/api/posts/missing", Some(&token), json!({ "content": "x" }))
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);
    let delete = app.delete("/api/posts/missing", Some(&token)).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn share_needs_no_identity_and_counts_up() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");
    let id = app.create_post(&token, "share me").await;

    let first = app.post(&format!("/api/posts/{id}/share"), None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, json!({ "shareCount": 1 }));

    let second = app.post(&format!("/api/posts/{id}/share"), Some(&token), None).await;
    assert_eq!(second.body, json!({ "shareCount": 2 }));

    let missing = app.post("/api/posts/missing/share", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn posts_by_user_lists_only_that_author() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    app.create_post(&alice, "a1").await;
    app.create_post(&bob, "b1").await;
    app.create_post(&alice, "a2").await;

    for uri in ["/api/posts/user/alice", "/api/users/alice/posts"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::OK);
        let contents: Vec<_> = response
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["content"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(contents, ["a2", "a1"]);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.token("alice", "Alice");

    let response = app
        .post("/api/posts", Some(&token), Some(json!({ "content": 42 })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn configured_limits_apply_to_posts_and_comments() {
    let app = TestApp::with_limits(ContentLimits { max_post_chars: 10, max_comment_chars: 5 });
    let token = app.token("alice", "Alice");

    let long = app
        .post("/api/posts", Some(&token), Some(json!({ "content": "x".repeat(11) })))
        .await;
    assert_eq!(long.status, StatusCode::BAD_REQUEST);
    assert_eq!(long.body["error"], "Post content cannot exceed 10 characters.");

    let post = app.create_post(&token, &"x".repeat(10)).await;
    let uri = format!("/api/posts/{post}/comments");
    let comment = app
        .post(&uri, Some(&token), Some(json!({ "content": "sixsix" })))
        .await;
    assert_eq!(comment.status, StatusCode::BAD_REQUEST);
    assert_eq!(comment.body["error"], "Comment content cannot exceed 5 characters.");

    let short = app.post(&uri, Some(&token), Some(json!({ "content": "hi" }))).await;
    assert_eq!(short.status, StatusCode::CREATED);
}
