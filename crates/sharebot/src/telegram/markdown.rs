//! MarkdownV2 escaping and send/edit helpers that recover from parse errors

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::RequestError;

/// Escapes every character MarkdownV2 reserves outside of entities.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.' | '!'
        ) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// `*text*` with the inner text escaped
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown_v2(text))
}

/// Inline code span. Only backslash and backtick need escaping inside.
pub fn code(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{}`", escaped)
}

fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Strips MarkdownV2 markup back to plain text for the fallback path.
fn strip_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            '*' | '`' => {}
            _ => result.push(c),
        }
    }
    result
}

/// Send a MarkdownV2 message, resending as plain text if Telegram rejects the markup.
pub async fn send_message_markdown_v2(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<Message> {
    let raw_text = text.into();
    let mut req = bot
        .send_message(chat_id, raw_text.clone())
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(kb) = keyboard.clone() {
        req = req.reply_markup(kb);
    }

    match req.await {
        Ok(msg) => Ok(msg),
        Err(e) if is_markdown_parse_error(&e) => {
            log::warn!("MarkdownV2 rejected, resending as plain text: {}", e);
            let mut retry = bot.send_message(chat_id, strip_markdown_v2(&raw_text));
            if let Some(kb) = keyboard {
                retry = retry.reply_markup(kb);
            }
            retry.await
        }
        Err(e) => Err(e),
    }
}

/// Edit a message to MarkdownV2 text, with the same plain-text fallback.
pub async fn edit_message_markdown_v2(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
) -> ResponseResult<Message> {
    let raw_text = text.into();
    match bot
        .edit_message_text(chat_id, message_id, raw_text.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .await
    {
        Ok(msg) => Ok(msg),
        Err(e) if is_markdown_parse_error(&e) => {
            log::warn!("MarkdownV2 rejected, editing as plain text: {}", e);
            bot.edit_message_text(chat_id, message_id, strip_markdown_v2(&raw_text))
                .await
        }
        Err(e) => Err(e),
    }
}
