//! linksphere/crates/domains/src/lib.rs
//!
//! The central domain types and port definitions for LinkSphere.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
