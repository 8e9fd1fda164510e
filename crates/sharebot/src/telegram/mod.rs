//! Telegram side of the bot: commands, handlers, message texts and delivery

pub mod bot;
pub mod delivery;
pub mod handlers;
pub mod keyboards;
pub mod markdown;
pub mod membership;
pub mod texts;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
