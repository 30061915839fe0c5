//! Handler types, dependencies, and user bookkeeping helpers

use std::sync::Arc;

use teloxide::types::Message;

use crate::search::SearchClient;
use crate::storage::db::{self, DbPool};
use crate::storage::get_connection;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub search: Arc<SearchClient>,
}

impl HandlerDeps {
    pub fn new(db_pool: Arc<DbPool>, search: Arc<SearchClient>) -> Self {
        Self { db_pool, search }
    }
}

/// Makes sure a user record exists for the sender of `msg`.
///
/// The insert is a single atomic insert-if-absent, so concurrent first
/// contacts cannot clobber each other and an existing record's first name
/// is never overwritten. Failures are logged, not surfaced — bookkeeping
/// must never break a user-facing flow.
pub fn ensure_user_exists(deps: &HandlerDeps, msg: &Message) {
    let user_id = msg.chat.id.0;
    let first_name = msg.from.as_ref().map(|u| u.first_name.clone());

    match get_connection(&deps.db_pool) {
        Ok(conn) => {
            if let Err(e) = db::ensure_user(&conn, user_id, first_name.as_deref()) {
                log::error!("Failed to ensure user {}: {}", user_id, e);
            }
        }
        Err(e) => log::error!("Failed to get connection for user bookkeeping: {}", e),
    }
}
