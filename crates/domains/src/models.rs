//! # Domain Models
//!
//! These structs represent the core entities of LinkSphere.
//! Documents are schemaless in the backing store; here every entity is an
//! explicit record with defaulted optional fields.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned document identifier.
pub type DocId = String;

/// Identity-verifier subject.
pub type UserId = String;

/// Display name recorded when the identity carries none.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous User";

/// Bio reported for identities that never created a profile.
pub const DEFAULT_BIO_PLACEHOLDER: &str = "This user hasn't set up a bio yet.";

/// Who is making the request, as vouched for by the identity verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CallerIdentity {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into(), name: None, email: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name snapshot written onto posts and comments.
    pub fn author_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => ANONYMOUS_AUTHOR.to_string(),
        }
    }
}

/// A short text update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: DocId,
    pub content: String,
    pub author_id: UserId,
    /// Snapshot of the author's name at creation time
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
    /// Each user id appears at most once
    #[serde(default)]
    pub likes: BTreeSet<UserId>,
    #[serde(default)]
    pub share_count: u64,
}

impl Post {
    pub fn is_authored_by(&self, user: &str) -> bool {
        self.author_id == user
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        self.likes.contains(user)
    }
}

/// Fields the caller supplies when creating a post; the store assigns the
/// id and the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub author_id: UserId,
    pub author_name: String,
}

/// A reply living in a post's comment sub-collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DocId,
    pub post_id: DocId,
    pub content: String,
    pub author_id: UserId,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn is_authored_by(&self, user: &str) -> bool {
        self.author_id == user
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: DocId,
    pub content: String,
    pub author_id: UserId,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Same as the identity-verifier subject
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Profile synthesized from a bare identity, used when no profile
    /// document exists yet.
    pub fn placeholder(identity: &CallerIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            display_name: identity.author_name(),
            email: identity.email.clone(),
            bio: DEFAULT_BIO_PLACEHOLDER.to_string(),
            created_at: None,
        }
    }
}

/// Partial update of a profile; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

/// A post as returned to clients: the like set collapsed to its size, plus
/// per-caller like state and the comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: DocId,
    pub content: String,
    pub author_id: UserId,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
    pub likes: usize,
    /// Present only when the request carried a verified identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_liked: Option<bool>,
    pub share_count: u64,
    pub comment_count: u64,
}

impl PostView {
    pub fn from_post(post: Post, comment_count: u64, caller: Option<&CallerIdentity>) -> Self {
        let user_liked = caller.map(|c| post.is_liked_by(&c.id));
        Self {
            likes: post.likes.len(),
            user_liked,
            comment_count,
            id: post.id,
            content: post.content,
            author_id: post.author_id,
            author_name: post.author_name,
            timestamp: post.timestamp,
            share_count: post.share_count,
        }
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: usize,
}

/// Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagCount {
    pub name: String,
    pub count: u64,
}
