//! Admin uploads collected into the pending batch

use teloxide::prelude::*;

use sharecore::core::config;
use sharecore::storage::StoredFile;

use super::types::{sender_id, HandlerDeps};
use crate::telegram::keyboards::upload_actions_keyboard;
use crate::telegram::markdown::send_message_markdown_v2;
use crate::telegram::texts;

/// Appends an uploaded file to the sender's batch and offers the link buttons.
pub async fn handle_media_upload(bot: &Bot, msg: &Message, deps: &HandlerDeps, file: StoredFile) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(user_id) = sender_id(msg) else {
        return Ok(());
    };

    if !config::admin::is_admin(user_id) {
        log::info!("📤 Upload from non-admin {} rejected", user_id);
        send_message_markdown_v2(bot, chat_id, texts::upload_denied(), None).await?;
        return Ok(());
    }

    let kind = file.kind;
    let count = deps.sessions.push_file(user_id, file).await;
    log::info!("📁 Admin {} added a {} ({} in batch)", user_id, kind, count);

    send_message_markdown_v2(bot, chat_id, texts::file_added(count), Some(upload_actions_keyboard())).await?;
    Ok(())
}

/// Reply for admin messages carrying an attachment that cannot be shared.
pub async fn handle_unsupported_media(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    send_message_markdown_v2(bot, msg.chat.id, texts::unsupported_media(), None).await?;
    Ok(())
}
