//! # Postgres document store
//!
//! This module implements the mapping between Postgres rows and the
//! `domains` records. Like arrays use `array_append`/`array_remove` inside a
//! single `UPDATE`, and the share counter uses `share_count + 1`, so every
//! read-modify-write is atomic per row without explicit locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Comment, CommentRepository, DomainError, NewComment, NewPost, Post, PostRepository,
    ProfileChanges, Result, UserProfile, UserRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{error, info};
use uuid::Uuid;

const POST_COLUMNS: &str = "id, content, author_id, author_name, timestamp, likes, share_count";
const COMMENT_COLUMNS: &str = "id, post_id, content, author_id, author_name, timestamp, edited_at";
const USER_COLUMNS: &str = "id, display_name, email, bio, created_at";

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connects and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(db_error)?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!(max_connections, "postgres document store ready");
        Ok(store)
    }

    /// Wraps an existing pool. Call [`migrate`](Self::migrate) before use
    /// unless the schema is already in place.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `posts`, `comments` and `users` tables if missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(DomainError::store)
    }
}

fn db_error(err: sqlx::Error) -> DomainError {
    error!(error = %err, "postgres query failed");
    DomainError::store(err)
}

fn post_from_row(row: &PgRow) -> std::result::Result<Post, sqlx::Error> {
    let likes: Vec<String> = row.try_get("likes")?;
    let shares: i64 = row.try_get("share_count")?;
    Ok(Post {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        author_id: row.try_get("author_id")?,
        author_name: row.try_get("author_name")?,
        timestamp: row.try_get("timestamp")?,
        likes: likes.into_iter().collect(),
        share_count: u64::try_from(shares).unwrap_or_default(),
    })
}

fn comment_from_row(row: &PgRow) -> std::result::Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        content: row.try_get("content")?,
        author_id: row.try_get("author_id")?,
        author_name: row.try_get("author_name")?,
        timestamp: row.try_get("timestamp")?,
        edited_at: row.try_get("edited_at")?,
    })
}

fn user_from_row(row: &PgRow) -> std::result::Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        email: row.try_get("email")?,
        bio: row.try_get("bio")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_rows<T>(
    rows: Vec<PgRow>,
    f: fn(&PgRow) -> std::result::Result<T, sqlx::Error>,
) -> Result<Vec<T>> {
    rows.iter().map(|r| f(r).map_err(db_error)).collect()
}

fn map_optional<T>(
    row: Option<PgRow>,
    f: fn(&PgRow) -> std::result::Result<T, sqlx::Error>,
) -> Result<Option<T>> {
    row.as_ref().map(f).transpose().map_err(db_error)
}

#[async_trait]
impl PostRepository for PgDocumentStore {
    /// Ties on `timestamp` fall back to `id`; callers must not rely on it.
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY timestamp DESC, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        map_rows(rows, post_from_row)
    }

    async fn list_posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY timestamp DESC, id"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        map_rows(rows, post_from_row)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        map_optional(row, post_from_row)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (id, content, author_id, author_name) VALUES ($1, $2, $3, $4) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(post.content)
        .bind(post.author_id)
        .bind(post.author_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        post_from_row(&row).map_err(db_error)
    }

    async fn update_post_content(&self, id: &str, content: String) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET content = $2 WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, post_from_row)
    }

    async fn delete_post(&self, id: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn add_like(&self, id: &str, user_id: &str) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET likes = CASE WHEN $2 = ANY(likes) THEN likes \
             ELSE array_append(likes, $2) END WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, post_from_row)
    }

    async fn remove_like(&self, id: &str, user_id: &str) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET likes = array_remove(likes, $2) WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, post_from_row)
    }

    async fn increment_share(&self, id: &str) -> Result<Option<u64>> {
        let shares: Option<i64> = sqlx::query_scalar(
            "UPDATE posts SET share_count = share_count + 1 WHERE id = $1 RETURNING share_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(shares.map(|n| u64::try_from(n).unwrap_or_default()))
    }
}

#[async_trait]
impl CommentRepository for PgDocumentStore {
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY timestamp, id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        map_rows(rows, comment_from_row)
    }

    async fn count_comments(&self, post_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn get_comment(&self, post_id: &str, comment_id: &str) -> Result<Option<Comment>> {
        let row = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 AND id = $2"
        ))
        .bind(post_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, comment_from_row)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let row = sqlx::query(&format!(
            "INSERT INTO comments (id, post_id, content, author_id, author_name) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(comment.post_id)
        .bind(comment.content)
        .bind(comment.author_id)
        .bind(comment.author_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        comment_from_row(&row).map_err(db_error)
    }

    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: String,
        edited_at: DateTime<Utc>,
    ) -> Result<Option<Comment>> {
        let row = sqlx::query(&format!(
            "UPDATE comments SET content = $3, edited_at = $4 WHERE post_id = $1 AND id = $2 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(post_id)
        .bind(comment_id)
        .bind(content)
        .bind(edited_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, comment_from_row)
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<bool> {
        let done = sqlx::query("DELETE FROM comments WHERE post_id = $1 AND id = $2")
            .bind(post_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for PgDocumentStore {
    async fn get_profile(&self, id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        map_optional(row, user_from_row)
    }

    async fn set_profile(&self, profile: UserProfile) -> Result<UserProfile> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, display_name, email, bio, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET display_name = EXCLUDED.display_name, \
             email = EXCLUDED.email, bio = EXCLUDED.bio, created_at = EXCLUDED.created_at \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(profile.id)
        .bind(profile.display_name)
        .bind(profile.email)
        .bind(profile.bio)
        .bind(profile.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        user_from_row(&row).map_err(db_error)
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!(
            "UPDATE users SET display_name = COALESCE($2, display_name), bio = COALESCE($3, bio) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.display_name)
        .bind(changes.bio)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        map_optional(row, user_from_row)
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        map_rows(rows, user_from_row)
    }
}
