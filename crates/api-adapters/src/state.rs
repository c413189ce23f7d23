//! State shared across all request handlers.

use std::sync::Arc;

use domains::{CommentRepository, IdentityVerifier, PostRepository, UserRepository};
use services::{CommentService, ContentLimits, PostService, SearchService, UserService};

use crate::metrics::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub search: Arc<SearchService>,
    pub users: Arc<UserService>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub metrics: Arc<HttpMetrics>,
}

impl AppState {
    /// Wires every service onto one document store and one identity verifier.
    pub fn new<S>(store: Arc<S>, identity: Arc<dyn IdentityVerifier>, limits: ContentLimits) -> Self
    where
        S: PostRepository + CommentRepository + UserRepository + 'static,
    {
        let posts: Arc<dyn PostRepository> = store.clone();
        let comments: Arc<dyn CommentRepository> = store.clone();
        let users: Arc<dyn UserRepository> = store;

        Self {
            posts: Arc::new(PostService::new(posts.clone(), comments.clone(), limits)),
            comments: Arc::new(CommentService::new(posts.clone(), comments.clone(), limits)),
            search: Arc::new(SearchService::new(posts, comments, users.clone())),
            users: Arc::new(UserService::new(users, identity.clone())),
            identity,
            metrics: Arc::new(HttpMetrics::new()),
        }
    }
}
