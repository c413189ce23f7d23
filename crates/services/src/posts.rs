//! # PostService
//!
//! Translates post operations into store calls, enforces authorship and
//! assembles `PostView`s.

use std::sync::Arc;

use domains::{
    CallerIdentity, CommentRepository, DomainError, LikeState, NewPost, Post, PostRepository,
    PostView, Result,
};
use tracing::{info, warn};

use crate::ContentLimits;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    limits: ContentLimits,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        limits: ContentLimits,
    ) -> Self {
        Self { posts, comments, limits }
    }

    /// Every post, newest first, enriched for `caller`.
    pub async fn list_posts(&self, caller: Option<&CallerIdentity>) -> Result<Vec<PostView>> {
        let posts = self.posts.list_posts().await?;
        enrich_posts(self.comments.as_ref(), posts, caller).await
    }

    pub async fn list_posts_by_author(
        &self,
        author_id: &str,
        caller: Option<&CallerIdentity>,
    ) -> Result<Vec<PostView>> {
        let posts = self.posts.list_posts_by_author(author_id).await?;
        enrich_posts(self.comments.as_ref(), posts, caller).await
    }

    pub async fn get_post(&self, id: &str, caller: Option<&CallerIdentity>) -> Result<PostView> {
        let post = self.load(id).await?;
        let count = self.comments.count_comments(&post.id).await?;
        Ok(PostView::from_post(post, count, caller))
    }

    pub async fn create_post(
        &self,
        caller: &CallerIdentity,
        content: Option<String>,
    ) -> Result<PostView> {
        let content = self.limits.check_post(content)?;
        let post = self
            .posts
            .create_post(NewPost {
                content,
                author_id: caller.id.clone(),
                author_name: caller.author_name(),
            })
            .await?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(PostView::from_post(post, 0, Some(caller)))
    }

    /// Content is the only mutable field.
    pub async fn update_post(
        &self,
        caller: &CallerIdentity,
        id: &str,
        content: Option<String>,
    ) -> Result<Post> {
        let post = self.load(id).await?;
        ensure_author(&post, caller, "edit")?;
        let content = self.limits.check_post(content)?;

        self.posts
            .update_post_content(id, content)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Removes the post document only; its comments stay reachable.
    pub async fn delete_post(&self, caller: &CallerIdentity, id: &str) -> Result<()> {
        let post = self.load(id).await?;
        ensure_author(&post, caller, "delete")?;

        if !self.posts.delete_post(id).await? {
            return Err(DomainError::not_found("Post", id));
        }
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// Adds the caller to the like set, or removes them if already present.
    pub async fn toggle_like(&self, caller: &CallerIdentity, id: &str) -> Result<LikeState> {
        let post = self.load(id).await?;
        let liked_before = post.is_liked_by(&caller.id);

        let updated = if liked_before {
            self.posts.remove_like(id, &caller.id).await?
        } else {
            self.posts.add_like(id, &caller.id).await?
        }
        .ok_or_else(|| DomainError::not_found("Post", id))?;

        let state = LikeState {
            liked: updated.is_liked_by(&caller.id),
            likes: updated.likes.len(),
        };
        info!(post_id = %id, user_id = %caller.id, liked = state.liked, "like toggled");
        Ok(state)
    }

    /// Open to any caller, authenticated or not.
    pub async fn share_post(&self, id: &str) -> Result<u64> {
        self.posts
            .increment_share(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn load(&self, id: &str) -> Result<Post> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }
}

fn ensure_author(post: &Post, caller: &CallerIdentity, action: &str) -> Result<()> {
    if post.is_authored_by(&caller.id) {
        return Ok(());
    }
    warn!(post_id = %post.id, user_id = %caller.id, action, "refused non-author post mutation");
    Err(DomainError::forbidden(format!(
        "User not authorized to {action} this post."
    )))
}

/// Attaches comment counts and per-caller like state, keeping input order.
pub(crate) async fn enrich_posts(
    comments: &dyn CommentRepository,
    posts: Vec<Post>,
    caller: Option<&CallerIdentity>,
) -> Result<Vec<PostView>> {
    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let count = comments.count_comments(&post.id).await?;
        views.push(PostView::from_post(post, count, caller));
    }
    Ok(views)
}
