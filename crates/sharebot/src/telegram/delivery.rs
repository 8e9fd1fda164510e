//! Pulling file references out of messages and sending them back by kind

use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile};

use sharecore::storage::{MediaKind, StoredFile};

/// File reference carried by `msg`, if it is a document, video or photo.
///
/// For photos the largest size is taken.
pub fn extract_media(msg: &Message) -> Option<StoredFile> {
    if let Some(document) = msg.document() {
        return Some(StoredFile::new(document.file.id.0.clone(), MediaKind::Document));
    }
    if let Some(video) = msg.video() {
        return Some(StoredFile::new(video.file.id.0.clone(), MediaKind::Video));
    }
    msg.photo()
        .and_then(|sizes| sizes.last())
        .map(|photo| StoredFile::new(photo.file.id.0.clone(), MediaKind::Photo))
}

/// True for attachments that cannot be turned into a link.
pub fn has_unsupported_attachment(msg: &Message) -> bool {
    msg.audio().is_some()
        || msg.voice().is_some()
        || msg.animation().is_some()
        || msg.sticker().is_some()
        || msg.video_note().is_some()
}

/// Sends a stored file to `chat_id` with the method matching its kind.
pub async fn send_stored_file(
    bot: &Bot,
    chat_id: ChatId,
    file: &StoredFile,
    caption: Option<String>,
) -> ResponseResult<Message> {
    let input = InputFile::file_id(FileId(file.file_id.clone()));
    match file.kind {
        MediaKind::Photo => {
            let mut req = bot.send_photo(chat_id, input);
            if let Some(caption) = caption {
                req = req.caption(caption);
            }
            req.await
        }
        MediaKind::Video => {
            let mut req = bot.send_video(chat_id, input);
            if let Some(caption) = caption {
                req = req.caption(caption);
            }
            req.await
        }
        MediaKind::Document => {
            let mut req = bot.send_document(chat_id, input);
            if let Some(caption) = caption {
                req = req.caption(caption);
            }
            req.await
        }
    }
}

/// Sends every file in order. A failed file is logged and skipped.
///
/// # Returns
/// Number of files that were delivered.
pub async fn send_stored_files(bot: &Bot, chat_id: ChatId, files: &[StoredFile]) -> usize {
    let mut delivered = 0;
    for (index, file) in files.iter().enumerate() {
        match send_stored_file(bot, chat_id, file, None).await {
            Ok(_) => delivered += 1,
            Err(e) => log::error!(
                "❌ Failed to send batch file {}/{} ({}) to chat {}: {}",
                index + 1,
                files.len(),
                file.kind,
                chat_id,
                e
            ),
        }
    }
    delivered
}
