//! PostgreSQL persistence layer for gatehouse.
//!
//! Provides the connection pool wrapper, embedded migrations, and the
//! record models for users, invitation keys, and invitation quotas.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::DbPool;
