//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command list registration

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

use sharecore::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "open a shared link or show the welcome message")]
    Start(String),
    #[command(description = "admin panel: timer, stats, reset")]
    Admin(String),
}

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid BOT_API_URL or HTTP client failure
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::require_bot_token()?;
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token, client);

    let bot = if let Some(bot_api_url) = config::bot_api::get_url() {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        bot.set_api_url(url)
    } else {
        bot
    };

    Ok(bot)
}

/// Command list shown in the Telegram UI
pub fn command_list() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "open a shared link or show the welcome message"),
        BotCommand::new("admin", "admin panel: timer, stats, reset"),
    ]
}

/// Sets up bot commands in Telegram UI
///
/// # Arguments
/// * `bot` - Bot instance to configure
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(command_list()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_start_with_payload() {
        let cmd = Command::parse("/start media_abc123", "share_bot").unwrap();
        assert_eq!(cmd, Command::Start("media_abc123".to_string()));
    }

    #[test]
    fn test_parse_start_without_payload() {
        let cmd = Command::parse("/start", "share_bot").unwrap();
        assert_eq!(cmd, Command::Start(String::new()));
    }

    #[test]
    fn test_parse_admin_with_mention() {
        let cmd = Command::parse("/admin@share_bot timer 30", "share_bot").unwrap();
        assert_eq!(cmd, Command::Admin("timer 30".to_string()));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Command::parse("/help", "share_bot").is_err());
    }

    #[test]
    fn test_command_list_matches_enum() {
        let names: Vec<String> = command_list().into_iter().map(|c| c.command).collect();
        assert_eq!(names, vec!["start", "admin"]);
    }
}
