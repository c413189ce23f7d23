//! # storage-adapters
//!
//! Document-store implementations of the repository ports.
//!
//! - `memory`: always compiled; DashMap collections living in the process.
//! - `postgres`: feature `db-postgres`; one table per collection via sqlx.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryDocumentStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgDocumentStore;
