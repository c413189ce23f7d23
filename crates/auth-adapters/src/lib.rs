//! # auth-adapters
//!
//! Identity verifier implementations.
//!
//! - `jwt`: feature `auth-jwt`; HS256 bearer tokens signed with a shared secret.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtConfig, JwtIdentityVerifier};
