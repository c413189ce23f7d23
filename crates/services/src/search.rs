//! # SearchService
//!
//! Read-only scans over the whole `posts` and `users` collections. Nothing
//! is indexed or cached; every call walks the collection.

use std::sync::Arc;

use domains::{
    CallerIdentity, CommentRepository, DomainError, HashtagCount, PostRepository, PostView, Result,
    UserProfile, UserRepository,
};
use tracing::debug;

use crate::hashtags::{has_hashtag, normalize_tag, top_matching_hashtags, TOP_HASHTAGS};
use crate::posts::enrich_posts;

/// Shortest accepted search query, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of profiles returned by a user search.
pub const MAX_USER_RESULTS: usize = 10;

pub struct SearchService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl SearchService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { posts, comments, users }
    }

    /// Top tags containing `query`, most frequent first. A leading `#` on
    /// the query is ignored.
    pub async fn search_hashtags(&self, query: &str) -> Result<Vec<HashtagCount>> {
        let query = check_query(query.trim().trim_start_matches('#'))?;
        let posts = self.posts.list_posts().await?;
        let ranked = top_matching_hashtags(
            posts.iter().map(|p| p.content.as_str()),
            query,
            TOP_HASHTAGS,
        );
        debug!(query, scanned = posts.len(), hits = ranked.len(), "hashtag search");
        Ok(ranked)
    }

    /// Posts tagged with `tag` as a whole token, newest first.
    pub async fn posts_by_hashtag(
        &self,
        tag: &str,
        caller: Option<&CallerIdentity>,
    ) -> Result<Vec<PostView>> {
        if normalize_tag(tag).is_empty() {
            return Err(DomainError::validation("Hashtag is required."));
        }
        let tagged = self
            .posts
            .list_posts()
            .await?
            .into_iter()
            .filter(|p| has_hashtag(&p.content, tag))
            .collect();
        enrich_posts(self.comments.as_ref(), tagged, caller).await
    }

    /// Case-insensitive substring match on display names, ordered by name.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserProfile>> {
        let needle = check_query(query)?.to_lowercase();
        let mut matches: Vec<UserProfile> = self
            .users
            .list_profiles()
            .await?
            .into_iter()
            .filter(|u| u.display_name.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(MAX_USER_RESULTS);
        Ok(matches)
    }
}

fn check_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Err(DomainError::validation(format!(
            "Search query must be at least {MIN_QUERY_CHARS} characters."
        )));
    }
    Ok(trimmed)
}
