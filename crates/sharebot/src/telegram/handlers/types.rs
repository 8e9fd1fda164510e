//! Handler error type and shared dependencies

use teloxide::prelude::*;
use teloxide::types::User;

use sharecore::storage::{AccessStore, MembershipCache, SessionStore};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: AccessStore,
    pub membership: MembershipCache,
    pub sessions: SessionStore,
    pub bot_username: String,
    /// Private channel holding the stored files
    pub database_channel: ChatId,
    /// Public channel users must join, without `@`
    pub backup_channel: String,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        store: AccessStore,
        membership: MembershipCache,
        sessions: SessionStore,
        bot_username: String,
        database_channel: ChatId,
        backup_channel: String,
    ) -> Self {
        Self {
            store,
            membership,
            sessions,
            bot_username,
            database_channel,
            backup_channel,
        }
    }
}

/// Telegram user id as the signed id used by the stores and the admin list.
pub fn user_id_of(user: &User) -> i64 {
    i64::try_from(user.id.0).unwrap_or(0)
}

/// Sender of a message, if any.
pub fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().map(user_id_of)
}
