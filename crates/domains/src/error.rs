//! # DomainError
//!
//! Centralized error handling for LinkSphere.
//! Every adapter converts its native failures into one of these variants so
//! the web layer can map them onto status codes without knowing the backend.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or malformed input (e.g., empty post content, short query)
    #[error("{0}")]
    Validation(String),

    /// No bearer token was supplied to an endpoint that requires one
    #[error("Unauthorized: No token provided.")]
    MissingCredentials,

    /// A bearer token was supplied but the identity verifier rejected it
    #[error("Unauthorized: Invalid token.")]
    InvalidCredentials(String),

    /// The caller is known but does not own the resource
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (e.g., Post, Comment, UserProfile)
    #[error("{entity} not found.")]
    NotFound { entity: &'static str, id: String },

    /// Persistence failure (e.g., DB down, corrupted document)
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("document encoding: {err}"))
    }
}

/// A specialized Result type for LinkSphere logic.
pub type Result<T> = std::result::Result<T, DomainError>;
