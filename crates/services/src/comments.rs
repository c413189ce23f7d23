//! # CommentService
//!
//! Comment CRUD scoped to a post's sub-collection. Same ownership and
//! validation rules as posts.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CallerIdentity, Comment, CommentRepository, DomainError, NewComment, PostRepository, Result,
};
use tracing::{info, warn};

use crate::ContentLimits;

pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    limits: ContentLimits,
}

impl CommentService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        limits: ContentLimits,
    ) -> Self {
        Self { posts, comments, limits }
    }

    /// Oldest first. Works for posts that have since been deleted.
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.comments.list_comments(post_id).await
    }

    pub async fn get_comment(&self, post_id: &str, comment_id: &str) -> Result<Comment> {
        self.load(post_id, comment_id).await
    }

    /// New comments need a live parent post.
    pub async fn add_comment(
        &self,
        caller: &CallerIdentity,
        post_id: &str,
        content: Option<String>,
    ) -> Result<Comment> {
        let content = self.limits.check_comment(content)?;
        if self.posts.get_post(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id: post_id.to_string(),
                content,
                author_id: caller.id.clone(),
                author_name: caller.author_name(),
            })
            .await?;
        info!(post_id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Replaces the content and stamps `edited_at`.
    pub async fn update_comment(
        &self,
        caller: &CallerIdentity,
        post_id: &str,
        comment_id: &str,
        content: Option<String>,
    ) -> Result<Comment> {
        let comment = self.load(post_id, comment_id).await?;
        ensure_author(&comment, caller, "edit")?;
        let content = self.limits.check_comment(content)?;

        self.comments
            .update_comment(post_id, comment_id, content, Utc::now())
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }

    pub async fn delete_comment(
        &self,
        caller: &CallerIdentity,
        post_id: &str,
        comment_id: &str,
    ) -> Result<()> {
        let comment = self.load(post_id, comment_id).await?;
        ensure_author(&comment, caller, "delete")?;

        if !self.comments.delete_comment(post_id, comment_id).await? {
            return Err(DomainError::not_found("Comment", comment_id));
        }
        info!(post_id, comment_id, "comment deleted");
        Ok(())
    }

    async fn load(&self, post_id: &str, comment_id: &str) -> Result<Comment> {
        self.comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }
}

fn ensure_author(comment: &Comment, caller: &CallerIdentity, action: &str) -> Result<()> {
    if comment.is_authored_by(&caller.id) {
        return Ok(());
    }
    warn!(comment_id = %comment.id, user_id = %caller.id, action, "refused non-author comment mutation");
    Err(DomainError::forbidden(format!(
        "User not authorized to {action} this comment."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockCommentRepository, MockPostRepository};

    fn comment(author: &str) -> Comment {
        Comment {
            id: "c1".into(),
            post_id: "p1".into(),
            content: "nice".into(),
            author_id: author.into(),
            author_name: author.into(),
            timestamp: Utc::now(),
            edited_at: None,
        }
    }

    fn service(posts: MockPostRepository, comments: MockCommentRepository) -> CommentService {
        CommentService::new(Arc::new(posts), Arc::new(comments), ContentLimits::default())
    }

    #[tokio::test]
    async fn adding_to_missing_post_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post().returning(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().never();

        let err = service(posts, comments)
            .add_comment(&CallerIdentity::new("bob"), "p1", Some("hey".into()))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("Post", "p1"));
    }

    #[tokio::test]
    async fn empty_comment_is_rejected_before_store_access() {
        let svc = service(MockPostRepository::new(), MockCommentRepository::new());
        let err = svc
            .add_comment(&CallerIdentity::new("bob"), "p1", Some(" \n".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_stamps_edited_at() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_get_comment()
            .returning(|_, _| Ok(Some(comment("bob"))));
        comments
            .expect_update_comment()
            .returning(|_, _, content, edited_at| {
                let mut c = comment("bob");
                c.content = content;
                c.edited_at = Some(edited_at);
                Ok(Some(c))
            });

        let updated = service(MockPostRepository::new(), comments)
            .update_comment(&CallerIdentity::new("bob"), "p1", "c1", Some("edited".into()))
            .await
            .unwrap();
        assert_eq!(updated.content, "edited");
        assert!(updated.edited_at.is_some());
    }

    #[tokio::test]
    async fn only_author_deletes() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_get_comment()
            .returning(|_, _| Ok(Some(comment("bob"))));
        comments.expect_delete_comment().never();

        let err = service(MockPostRepository::new(), comments)
            .delete_comment(&CallerIdentity::new("eve"), "p1", "c1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
