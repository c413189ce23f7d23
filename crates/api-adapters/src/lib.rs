//! # api-adapters
//!
//! The REST routing and orchestration layer for LinkSphere.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;

#[cfg(feature = "web-axum")]
mod routes {
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceBuilder;

    use crate::handlers::{self, comments, posts, search, users};
    use crate::metrics::track_requests;
    use crate::middleware;
    use crate::state::AppState;

    /// Builds the full application router.
    ///
    /// Static segments (`search`, `hashtag`, `user`) take priority over the
    /// `{id}` parameter at the same position.
    pub fn router(state: AppState, cors_allow_any_origin: bool) -> Router {
        let api = Router::new()
            .route("/api/test", get(handlers::api_test))
            .route("/api/protected", get(handlers::protected))
            // Posts
            .route("/api/posts", get(posts::list_posts).post(posts::create_post))
            .route("/api/posts/search/hashtag", get(search::hashtag_search))
            .route("/api/posts/hashtag/{tag}", get(search::posts_by_hashtag))
            .route("/api/posts/user/{uid}", get(posts::posts_by_user))
            .route(
                "/api/posts/{id}",
                get(posts::get_post)
                    .put(posts::update_post)
                    .delete(posts::delete_post),
            )
            .route("/api/posts/{id}/like", post(posts::like_post))
            .route("/api/posts/{id}/share", post(posts::share_post))
            // Comments
            .route(
                "/api/posts/{id}/comments",
                get(comments::list_comments).post(comments::add_comment),
            )
            .route(
                "/api/posts/{id}/comments/{comment_id}",
                get(comments::get_comment)
                    .put(comments::update_comment)
                    .delete(comments::delete_comment),
            )
            // Users
            .route("/api/users", post(users::create_profile))
            .route("/api/users/search", get(users::search_users))
            .route(
                "/api/users/{uid}",
                get(users::get_profile).put(users::update_profile),
            )
            .route("/api/users/{uid}/posts", get(users::user_posts));

        Router::new()
            .route("/", get(handlers::root))
            .route("/metrics", get(handlers::metrics))
            .merge(api)
            .layer(axum::middleware::from_fn_with_state(
                state.metrics.clone(),
                track_requests,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::set_request_id())
                    .layer(middleware::trace_layer())
                    .layer(middleware::propagate_request_id())
                    .layer(middleware::cors_policy(cors_allow_any_origin)),
            )
            .with_state(state)
    }
}
