//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! The repositories mirror what a document store offers: single-document
//! get/set/update/delete, equality filters, ordering by one field, and the
//! atomic array-add / array-remove / counter-increment primitives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    CallerIdentity, Comment, NewComment, NewPost, Post, ProfileChanges, UserProfile,
};

/// Persistence contract for the `posts` collection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;
    /// Posts whose `author_id` equals `author_id`, newest first.
    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;

    /// Stores a new post with a fresh id, a server timestamp, an empty like
    /// set and a zero share count.
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    /// Returns `None` when the post does not exist.
    async fn update_post_content(&self, id: &str, content: String) -> Result<Option<Post>>;
    /// Returns `false` when the post did not exist. Comments are left alone.
    async fn delete_post(&self, id: &str) -> Result<bool>;

    // Atomic per-document primitives
    async fn add_like(&self, id: &str, user_id: &str) -> Result<Option<Post>>;
    async fn remove_like(&self, id: &str, user_id: &str) -> Result<Option<Post>>;
    /// Returns the new share count, or `None` when the post does not exist.
    async fn increment_share(&self, id: &str) -> Result<Option<u64>>;
}

/// Persistence contract for a post's `comments` sub-collection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of one post, oldest first.
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>>;
    async fn count_comments(&self, post_id: &str) -> Result<u64>;
    async fn get_comment(&self, post_id: &str, comment_id: &str) -> Result<Option<Comment>>;
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: String,
        edited_at: DateTime<Utc>,
    ) -> Result<Option<Comment>>;
    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<bool>;
}

/// Persistence contract for the `users` collection.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_profile(&self, id: &str) -> Result<Option<UserProfile>>;
    /// Overwrites any existing profile with the same id.
    async fn set_profile(&self, profile: UserProfile) -> Result<UserProfile>;
    async fn update_profile(&self, id: &str, changes: ProfileChanges)
        -> Result<Option<UserProfile>>;
    async fn list_profiles(&self) -> Result<Vec<UserProfile>>;
}

/// Identity contract: turns bearer tokens into caller identities.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Fails with `DomainError::InvalidCredentials` for any token it cannot
    /// vouch for.
    async fn verify_token(&self, token: &str) -> Result<CallerIdentity>;

    /// Looks up an identity the provider knows about, without a token.
    async fn lookup_user(&self, id: &str) -> Result<Option<CallerIdentity>>;
}
