//! Files posted straight into the database channel

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use sharecore::core::config;
use sharecore::core::expiry::ExpiryTimer;
use sharecore::core::links::build_start_link;
use sharecore::storage::{AccessPayload, StoredFile};

use super::types::{sender_id, HandlerDeps};
use crate::telegram::texts;

/// Whether a channel post should get an automatic link.
///
/// Only posts in the database channel qualify. Channel posts normally carry no
/// sender; when one is present it has to be an admin.
pub fn accepts_channel_post(chat_id: ChatId, database_channel: ChatId, sender: Option<i64>) -> bool {
    if chat_id != database_channel {
        return false;
    }
    match sender {
        Some(user_id) => config::admin::is_admin(user_id),
        None => true,
    }
}

/// Registers a database channel post under a new code and replies to it with the link.
pub async fn handle_channel_post(bot: &Bot, msg: &Message, deps: &HandlerDeps, file: StoredFile) -> ResponseResult<()> {
    if !accepts_channel_post(msg.chat.id, deps.database_channel, sender_id(msg)) {
        return Ok(());
    }

    let kind = file.kind;
    let record = deps
        .store
        .create(msg.id.0, AccessPayload::Single(file), ExpiryTimer::DEFAULT, Utc::now())
        .await;
    let link = build_start_link(&deps.bot_username, record.payload.link_kind(), &record.code);

    let text = texts::auto_generated_link(&record.code, kind, record.expires_at, &link);
    match bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await
    {
        Ok(_) => log::info!("🔗 Auto-generated link for channel upload with code: {}", record.code),
        Err(e) => log::error!("Failed to send link reply in database channel: {}", e),
    }
    Ok(())
}
