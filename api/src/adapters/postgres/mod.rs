//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod content_repo;

pub use content_repo::PostgresContentRepository;
