//! # In-memory document store
//!
//! DashMap-backed implementation of every repository port. Each document
//! lives in one map entry, so mutating an entry through `get_mut` holds that
//! shard's write lock and gives the same single-document atomicity a managed
//! document store offers. No multi-document transactions exist.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domains::{
    Comment, CommentRepository, DocId, DomainError, NewComment, NewPost, Post, PostRepository,
    ProfileChanges, Result, UserId, UserProfile, UserRepository,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryDocumentStore {
    posts: DashMap<DocId, Post>,
    /// Keyed by comment id; `Comment::post_id` links back to the parent.
    comments: DashMap<DocId, Comment>,
    users: DashMap<UserId, UserProfile>,
    /// Last timestamp handed out, in microseconds since the epoch.
    last_write_micros: AtomicI64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server timestamp, strictly increasing across writes so that ordering
    /// by timestamp never ties.
    fn server_timestamp(&self) -> Result<DateTime<Utc>> {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_write_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        let assigned = now.max(previous + 1);
        DateTime::from_timestamp_micros(assigned)
            .ok_or_else(|| DomainError::store("server timestamp out of range"))
    }

    fn sorted_newest_first(mut posts: Vec<Post>) -> Vec<Post> {
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        posts
    }
}

fn new_id() -> DocId {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl PostRepository for MemoryDocumentStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.iter().map(|e| e.value().clone()).collect();
        Ok(Self::sorted_newest_first(posts))
    }

    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let posts = self
            .posts
            .iter()
            .filter(|e| e.author_id == author_id)
            .map(|e| e.value().clone())
            .collect();
        Ok(Self::sorted_newest_first(posts))
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get(id).map(|e| e.value().clone()))
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let stored = Post {
            id: new_id(),
            content: post.content,
            author_id: post.author_id,
            author_name: post.author_name,
            timestamp: self.server_timestamp()?,
            likes: Default::default(),
            share_count: 0,
        };
        self.posts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_post_content(&self, id: &str, content: String) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(id).map(|mut e| {
            e.content = content;
            e.value().clone()
        }))
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        Ok(self.posts.remove(id).is_some())
    }

    async fn add_like(&self, id: &str, user_id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(id).map(|mut e| {
            e.likes.insert(user_id.to_string());
            e.value().clone()
        }))
    }

    async fn remove_like(&self, id: &str, user_id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(id).map(|mut e| {
            e.likes.remove(user_id);
            e.value().clone()
        }))
    }

    async fn increment_share(&self, id: &str) -> Result<Option<u64>> {
        Ok(self.posts.get_mut(id).map(|mut e| {
            e.share_count += 1;
            e.share_count
        }))
    }
}

#[async_trait]
impl CommentRepository for MemoryDocumentStore {
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|e| e.post_id == post_id)
            .map(|e| e.value().clone())
            .collect();
        comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(comments)
    }

    async fn count_comments(&self, post_id: &str) -> Result<u64> {
        Ok(self.comments.iter().filter(|e| e.post_id == post_id).count() as u64)
    }

    async fn get_comment(&self, post_id: &str, comment_id: &str) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .get(comment_id)
            .filter(|e| e.post_id == post_id)
            .map(|e| e.value().clone()))
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let stored = Comment {
            id: new_id(),
            post_id: comment.post_id,
            content: comment.content,
            author_id: comment.author_id,
            author_name: comment.author_name,
            timestamp: self.server_timestamp()?,
            edited_at: None,
        };
        self.comments.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: String,
        edited_at: DateTime<Utc>,
    ) -> Result<Option<Comment>> {
        let Some(mut entry) = self.comments.get_mut(comment_id) else {
            return Ok(None);
        };
        if entry.post_id != post_id {
            return Ok(None);
        }
        entry.content = content;
        entry.edited_at = Some(edited_at);
        Ok(Some(entry.value().clone()))
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<bool> {
        Ok(self
            .comments
            .remove_if(comment_id, |_, c| c.post_id == post_id)
            .is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryDocumentStore {
    async fn get_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        Ok(self.users.get(id).map(|e| e.value().clone()))
    }

    async fn set_profile(&self, profile: UserProfile) -> Result<UserProfile> {
        self.users.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<UserProfile>> {
        Ok(self.users.get_mut(id).map(|mut e| {
            if let Some(name) = changes.display_name {
                e.display_name = name;
            }
            if let Some(bio) = changes.bio {
                e.bio = bio;
            }
            e.value().clone()
        }))
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }
}
