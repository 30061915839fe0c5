//! Database access: connection pool, user records, archive file index

pub mod archive;
pub mod db;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
