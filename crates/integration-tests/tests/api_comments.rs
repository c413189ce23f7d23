use axum::http::StatusCode;
use integration_tests::TestApp;
use serde_json::json;

async fn add_comment(app: &TestApp, token: &str, post_id: &str, content: &str) -> String {
    let response = app
        .post(
            &format!("/api/posts/{post_id}/comments"),
            Some(token),
            Some(json!({ "content": content })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let post = app.create_post(&alice, "thread").await;

    add_comment(&app, &bob, &post, "first!").await;
    add_comment(&app, &alice, &post, "thanks").await;

    let response = app.get(&format!("/api/posts/{post}/comments"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let comments = response.body.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "first!");
    assert_eq!(comments[0]["authorName"], "Bob");
    assert_eq!(comments[1]["content"], "thanks");
    assert!(comments[0].get("editedAt").is_none());
}

#[tokio::test]
async fn adding_a_comment_requires_identity_and_content() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let post = app.create_post(&alice, "thread").await;
    let uri = format!("/api/posts/{post}/comments");

    let anonymous = app.post(&uri, None, Some(json!({ "content": "hi" }))).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let empty = app.post(&uri, Some(&alice), Some(json!({ "content": "" }))).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["error"], "Comment content is required.");

    let missing_post = app
        .post("/api/posts/nope/comments", Some(&alice), Some(json!({ "content": "hi" })))
        .await;
    assert_eq!(missing_post.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_comment_author_can_edit_and_edit_is_stamped() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let post = app.create_post(&alice, "thread").await;
    let comment = add_comment(&app, &bob, &post, "typo").await;
    let uri = format!("/api/posts/{post}/comments/{comment}");

    // The post author has no say over other people's comments.
    let foreign = app.put(&uri, Some(&alice), json!({ "content": "hijack" })).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
    assert_eq!(foreign.body["error"], "User not authorized to edit this comment.");

    let edited = app.put(&uri, Some(&bob), json!({ "content": "fixed" })).await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["content"], "fixed");
    assert!(edited.body["editedAt"].is_string());

    let fetched = app.get(&uri, None).await;
    assert_eq!(fetched.body["content"], "fixed");
}

#[tokio::test]
async fn only_the_comment_author_can_delete() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let post = app.create_post(&alice, "thread").await;
    let comment = add_comment(&app, &bob, &post, "bye").await;
    let uri = format!("/api/posts/{post}/comments/{comment}");

    let foreign = app.delete(&uri, Some(&alice)).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let own = app.delete(&uri, Some(&bob)).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["message"], "Comment deleted successfully.");

    let gone = app.get(&uri, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let again = app.delete(&uri, Some(&bob)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_are_scoped_to_their_post() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let one = app.create_post(&alice, "one").await;
    let two = app.create_post(&alice, "two").await;
    let comment = add_comment(&app, &alice, &one, "on one").await;

    let wrong_post = app
        .get(&format!("/api/posts/{two}/comments/{comment}"), None)
        .await;
    assert_eq!(wrong_post.status, StatusCode::NOT_FOUND);

    let listed = app.get(&format!("/api/posts/{two}/comments"), None).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn deleting_a_post_leaves_its_comments_reachable() {
    let app = TestApp::new();
    let alice = app.token("alice", "Alice");
    let bob = app.token("bob", "Bob");
    let post = app.create_post(&alice, "short lived").await;
    let comment = add_comment(&app, &bob, &post, "still here").await;

    let deleted = app.delete(&format!("/api/posts/{post}"), Some(&alice)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let listed = app.get(&format!("/api/posts/{post}/comments"), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let direct = app
        .get(&format!("/api/posts/{post}/comments/{comment}"), None)
        .await;
    assert_eq!(direct.status, StatusCode::OK);
    assert_eq!(direct.body["content"], "still here");

    // Orphans stay editable by their author, but the thread is closed to new replies.
    let edited = app
        .put(
            &format!("/api/posts/{post}/comments/{comment}"),
            Some(&bob),
            json!({ "content": "still here, edited" }),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    let reply = app
        .post(
            &format!("/api/posts/{post}/comments"),
            Some(&bob),
            Some(json!({ "content": "late reply" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}
