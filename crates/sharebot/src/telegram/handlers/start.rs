//! /start: welcome messages and code redemption

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, User};

use sharecore::core::config;
use sharecore::core::links::parse_start_payload;
use sharecore::storage::AccessPayload;

use super::types::{user_id_of, HandlerDeps};
use crate::telegram::delivery::{send_stored_file, send_stored_files};
use crate::telegram::keyboards::join_backup_keyboard;
use crate::telegram::markdown::send_message_markdown_v2;
use crate::telegram::membership::passes_backup_gate;
use crate::telegram::texts;

/// Handles `/start [payload]`.
///
/// With a payload the code is redeemed; without one a welcome is shown.
pub async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps, payload: &str) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    match parse_start_payload(payload) {
        Some(code) => redeem_code(bot, msg, deps, user, &code).await,
        None => send_welcome(bot, msg, deps, user).await,
    }
}

async fn redeem_code(bot: &Bot, msg: &Message, deps: &HandlerDeps, user: &User, code: &str) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let Some(record) = deps.store.redeem(code, Utc::now()).await else {
        send_message_markdown_v2(bot, chat_id, texts::invalid_code(), None).await?;
        return Ok(());
    };

    if !passes_backup_gate(bot, deps, user).await {
        log::info!("🔒 User {} has not joined @{}, code {} withheld", user.id, deps.backup_channel, code);
        send_message_markdown_v2(bot, chat_id, texts::access_restricted(), join_keyboard(deps)).await?;
        return Ok(());
    }

    match &record.payload {
        AccessPayload::Single(file) => {
            send_stored_file(bot, chat_id, file, None).await?;
        }
        AccessPayload::Batch { files } => {
            send_message_markdown_v2(bot, chat_id, texts::batch_header(files.len()), None).await?;
            let delivered = send_stored_files(bot, chat_id, files).await;
            log::info!("📦 Delivered {}/{} files of batch {} to {}", delivered, files.len(), code, chat_id);
        }
    }
    Ok(())
}

async fn send_welcome(bot: &Bot, msg: &Message, deps: &HandlerDeps, user: &User) -> ResponseResult<()> {
    if config::admin::is_admin(user_id_of(user)) {
        send_message_markdown_v2(bot, msg.chat.id, texts::admin_welcome(), None).await?;
    } else {
        send_message_markdown_v2(bot, msg.chat.id, texts::public_welcome(), join_keyboard(deps)).await?;
    }
    Ok(())
}

fn join_keyboard(deps: &HandlerDeps) -> Option<InlineKeyboardMarkup> {
    match join_backup_keyboard(&deps.backup_channel) {
        Ok(keyboard) => Some(keyboard),
        Err(e) => {
            log::warn!("Invalid backup channel username {:?}: {}", deps.backup_channel, e);
            None
        }
    }
}
