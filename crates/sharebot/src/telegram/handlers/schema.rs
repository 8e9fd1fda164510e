//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use sharecore::core::config;
use sharecore::storage::StoredFile;

use super::admin::handle_admin_command;
use super::callbacks::handle_upload_callback;
use super::channel::handle_channel_post;
use super::start::handle_start_command;
use super::types::{sender_id, HandlerDeps, HandlerError};
use super::uploads::{handle_media_upload, handle_unsupported_media};
use crate::telegram::bot::Command;
use crate::telegram::delivery::{extract_media, has_unsupported_attachment};

/// Creates the dispatcher schema for the bot.
///
/// # Arguments
/// * `deps` - Stores, sessions and channel settings shared by every handler
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_channel = deps.clone();
    let deps_uploads = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(channel_post_handler(deps_channel))
        .branch(media_upload_handler(deps_uploads))
        .branch(unsupported_media_handler())
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start(payload) => handle_start_command(&bot, &msg, &deps, &payload).await?,
                    Command::Admin(args) => handle_admin_command(&bot, &msg, &deps, &args).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Document/video/photo posts in channels
fn channel_post_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_channel_post()
        .filter_map(|msg: Message| extract_media(&msg))
        .endpoint(move |bot: Bot, msg: Message, file: StoredFile| {
            let deps = deps.clone();
            async move {
                handle_channel_post(&bot, &msg, &deps, file).await?;
                Ok(())
            }
        })
}

/// Document/video/photo messages outside channels
fn media_upload_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| !msg.chat.is_channel())
        .filter_map(|msg: Message| extract_media(&msg))
        .endpoint(move |bot: Bot, msg: Message, file: StoredFile| {
            let deps = deps.clone();
            async move {
                handle_media_upload(&bot, &msg, &deps, file).await?;
                Ok(())
            }
        })
}

/// Admin messages with an attachment that cannot be linked
fn unsupported_media_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| {
            !msg.chat.is_channel()
                && has_unsupported_attachment(&msg)
                && sender_id(&msg).is_some_and(config::admin::is_admin)
        })
        .endpoint(|bot: Bot, msg: Message| async move {
            handle_unsupported_media(&bot, &msg).await?;
            Ok(())
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            handle_upload_callback(&bot, &q, &deps).await?;
            Ok(())
        }
    })
}
