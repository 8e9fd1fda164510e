//! Backup channel gate

use teloxide::prelude::*;
use teloxide::types::{Recipient, User};

use sharecore::core::config;

use crate::telegram::handlers::types::{user_id_of, HandlerDeps};

/// Asks Telegram whether `user_id` is in the backup channel.
///
/// Owners, administrators and plain members count as joined. Any API error
/// (bot not in the channel, private channel, network) counts as not joined.
pub async fn has_joined_backup(bot: &Bot, backup_channel: &str, user_id: UserId) -> bool {
    let channel = Recipient::ChannelUsername(format!("@{}", backup_channel));
    match bot.get_chat_member(channel, user_id).await {
        Ok(member) => member.kind.is_privileged() || member.kind.is_member(),
        Err(e) => {
            log::warn!("Could not check membership for user {}: {}", user_id, e);
            false
        }
    }
}

/// Admins and cached members pass straight through. Everyone else is checked
/// against the backup channel and cached on success.
pub async fn passes_backup_gate(bot: &Bot, deps: &HandlerDeps, user: &User) -> bool {
    let user_id = user_id_of(user);
    if config::admin::is_admin(user_id) || deps.membership.contains(user_id).await {
        return true;
    }
    if has_joined_backup(bot, &deps.backup_channel, user.id).await {
        deps.membership.insert(user_id).await;
        return true;
    }
    false
}
