//! /admin: timer configuration and statistics

use teloxide::prelude::*;

use sharecore::core::config;
use sharecore::core::expiry::{ExpiryTimer, TimerError};

use super::types::{sender_id, HandlerDeps};
use crate::telegram::markdown::{escape_markdown_v2, send_message_markdown_v2};
use crate::telegram::texts;

/// Parsed `/admin` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    /// No arguments: show the control panel
    Panel,
    /// `timer` without a value
    TimerUsage,
    /// `timer <minutes>`, already validated
    SetTimer(Result<ExpiryTimer, TimerError>),
    Stats,
    Reset,
    Unknown(String),
}

impl AdminAction {
    /// Parses the text after `/admin`. The subcommand is case-insensitive.
    pub fn parse(args: &str) -> Self {
        let mut parts = args.split_whitespace();
        let Some(command) = parts.next() else {
            return AdminAction::Panel;
        };

        match command.to_lowercase().as_str() {
            "timer" => match parts.next() {
                Some(value) => AdminAction::SetTimer(ExpiryTimer::parse(value)),
                None => AdminAction::TimerUsage,
            },
            "stats" => AdminAction::Stats,
            "reset" => AdminAction::Reset,
            other => AdminAction::Unknown(other.to_string()),
        }
    }
}

/// Handles `/admin [timer <minutes> | stats | reset]`.
pub async fn handle_admin_command(bot: &Bot, msg: &Message, deps: &HandlerDeps, args: &str) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(user_id) = sender_id(msg) else {
        return Ok(());
    };

    if !config::admin::is_admin(user_id) {
        log::warn!("Non-admin {} tried /admin", user_id);
        send_message_markdown_v2(bot, chat_id, texts::admin_panel_denied(), None).await?;
        return Ok(());
    }

    let text = match AdminAction::parse(args) {
        AdminAction::Panel => texts::admin_panel(
            deps.membership.len().await,
            deps.sessions.timer(user_id).await,
            deps.database_channel.0,
        ),
        AdminAction::TimerUsage => texts::timer_usage(),
        AdminAction::SetTimer(Ok(timer)) => {
            deps.sessions.set_timer(user_id, timer).await;
            log::info!("⏰ Admin {} set link timer to {} minutes", user_id, timer.minutes());
            texts::timer_updated(timer)
        }
        AdminAction::SetTimer(Err(e)) => escape_markdown_v2(&e.to_string()),
        AdminAction::Stats => texts::admin_stats(
            deps.membership.len().await,
            deps.sessions.timer(user_id).await,
            &deps.backup_channel,
            deps.database_channel.0,
        ),
        AdminAction::Reset => {
            deps.sessions.reset_timer(user_id).await;
            log::info!("🔄 Admin {} reset link timer", user_id);
            texts::timer_reset()
        }
        AdminAction::Unknown(command) => {
            log::info!("Unknown /admin subcommand {:?} from {}", command, user_id);
            texts::unknown_admin_command()
        }
    };

    send_message_markdown_v2(bot, chat_id, text, None).await?;
    Ok(())
}
