//! Update handlers and the dispatcher schema

pub mod admin;
pub mod callback;
pub mod channel;
pub mod commands;
pub mod schema;
pub mod types;

// Re-exports for convenience
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
