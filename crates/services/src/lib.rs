//! # services
//!
//! Business rules of LinkSphere, written against the ports in `domains`.
//! Nothing here knows about HTTP or about a concrete store.

pub mod comments;
pub mod hashtags;
pub mod posts;
pub mod search;
pub mod users;

pub use comments::CommentService;
pub use posts::PostService;
pub use search::SearchService;
pub use users::UserService;

use domains::{DomainError, Result};

/// Length rules for user-authored text, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    pub max_post_chars: usize,
    pub max_comment_chars: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self { max_post_chars: 280, max_comment_chars: 1000 }
    }
}

impl ContentLimits {
    pub fn check_post(&self, content: Option<String>) -> Result<String> {
        check_text(content, "Post", self.max_post_chars)
    }

    pub fn check_comment(&self, content: Option<String>) -> Result<String> {
        check_text(content, "Comment", self.max_comment_chars)
    }
}

fn check_text(content: Option<String>, what: &str, max_chars: usize) -> Result<String> {
    let content = match content {
        Some(c) if !c.trim().is_empty() => c,
        _ => return Err(DomainError::validation(format!("{what} content is required."))),
    };
    if content.chars().count() > max_chars {
        return Err(DomainError::validation(format!(
            "{what} content cannot exceed {max_chars} characters."
        )));
    }
    Ok(content)
}
