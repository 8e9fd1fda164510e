//! Link generation buttons

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::MessageId;

use sharecore::core::config;
use sharecore::core::error::{AppError, AppResult};
use sharecore::core::expiry::ExpiryTimer;
use sharecore::core::links::build_start_link;
use sharecore::storage::{AccessPayload, AccessRecord};

use super::types::{user_id_of, HandlerDeps};
use crate::telegram::delivery::send_stored_file;
use crate::telegram::keyboards::UploadAction;
use crate::telegram::markdown::edit_message_markdown_v2;
use crate::telegram::texts;

/// Handles the buttons attached to the "File Added" message.
pub async fn handle_upload_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query: {}", e);
    }

    let Some((chat_id, message_id)) = q.message.as_ref().map(|m| (m.chat().id, m.id())) else {
        return Ok(());
    };
    let user_id = user_id_of(&q.from);

    if !config::admin::is_admin(user_id) {
        log::warn!("Non-admin {} pressed an upload button", user_id);
        edit_message_markdown_v2(bot, chat_id, message_id, texts::callback_denied()).await?;
        return Ok(());
    }

    let Some(action) = q.data.as_deref().and_then(|data| data.parse::<UploadAction>().ok()) else {
        log::warn!("Unknown callback data {:?} from {}", q.data, user_id);
        return Ok(());
    };

    let pending = deps.sessions.batch_len(user_id).await;
    if pending == 0 {
        edit_message_markdown_v2(bot, chat_id, message_id, texts::no_files()).await?;
        return Ok(());
    }

    let payload = match action {
        UploadAction::AddMore => {
            edit_message_markdown_v2(bot, chat_id, message_id, texts::batch_mode_active(pending)).await?;
            return Ok(());
        }
        UploadAction::GenerateSingle => deps.sessions.take_batch(user_id).await.pop().map(AccessPayload::Single),
        UploadAction::GenerateBatch => {
            let files = deps.sessions.take_batch(user_id).await;
            (!files.is_empty()).then_some(AccessPayload::Batch { files })
        }
    };

    // another press may have taken the batch since the length check
    let Some(payload) = payload else {
        edit_message_markdown_v2(bot, chat_id, message_id, texts::no_files()).await?;
        return Ok(());
    };

    let timer = deps.sessions.timer(user_id).await;
    generate_link(bot, deps, (chat_id, message_id), payload, timer).await
}

async fn generate_link(
    bot: &Bot,
    deps: &HandlerDeps,
    (chat_id, message_id): (ChatId, MessageId),
    payload: AccessPayload,
    timer: ExpiryTimer,
) -> ResponseResult<()> {
    let is_batch = matches!(payload, AccessPayload::Batch { .. });
    let count = payload.len();
    let result = save_to_database_channel(bot, deps, payload, timer).await;

    let text = match result {
        Ok(record) => {
            let link = build_start_link(&deps.bot_username, record.payload.link_kind(), &record.code);
            if is_batch {
                texts::batch_link_generated(count, &link, timer)
            } else {
                texts::single_link_generated(&link, timer)
            }
        }
        Err(e) => {
            log::error!("Failed to save media to database channel: {}", e);
            texts::link_failed(is_batch)
        }
    };

    edit_message_markdown_v2(bot, chat_id, message_id, text).await?;
    Ok(())
}

/// Copies the payload's first file into the database channel and stores the
/// record under a fresh code, pointing at the channel message.
///
/// # Errors
/// * `Validation` - the payload has no files
/// * `Telegram` - sending to the database channel failed; nothing is stored
pub async fn save_to_database_channel(
    bot: &Bot,
    deps: &HandlerDeps,
    payload: AccessPayload,
    timer: ExpiryTimer,
) -> AppResult<AccessRecord> {
    let first = payload
        .first()
        .cloned()
        .ok_or_else(|| AppError::Validation("no files to store".to_string()))?;

    let code = deps.store.fresh_code().await;
    let mut record = AccessRecord::new(code, 0, payload, timer, Utc::now());
    let caption = texts::database_caption(&record)?;

    let sent = send_stored_file(bot, deps.database_channel, &first, Some(caption)).await?;
    record.message_id = sent.id.0;

    if deps.store.insert(record.clone()).await.is_some() {
        log::warn!("Access code {} was reused, previous record replaced", record.code);
    }
    log::info!("💾 Saved media to database channel with code: {}", record.code);
    Ok(record)
}
