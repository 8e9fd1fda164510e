use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use sharebot::cli::{Cli, Commands};
use sharebot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use sharecore::core::status_server::{start_status_server, StatusState};
use sharecore::core::{config, init_logger, log_startup_configuration};
use sharecore::storage::{AccessStore, MembershipCache, SessionStore};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the requested subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, token, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    let bot = create_bot()?;

    // Retry while a local Bot API server is still starting up
    let me = {
        let max_retries = config::startup::MAX_GET_ME_RETRIES;
        let mut attempt = 0;
        loop {
            match bot.get_me().await {
                Ok(me) => break me,
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} retries: {}",
                            attempt,
                            e
                        ));
                    }
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in {}s...",
                        attempt,
                        max_retries,
                        e,
                        config::startup::GET_ME_RETRY_DELAY_SECS
                    );
                    sleep(config::startup::get_me_retry_delay()).await;
                }
            }
        }
    };
    let bot_username = me.username.clone().unwrap_or_default();
    log::info!("Bot username: @{}, Bot ID: {}", bot_username, me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let store = AccessStore::new();
    let membership = MembershipCache::new();
    let sessions = SessionStore::new();

    if *config::status::ENABLED {
        let port = *config::status::PORT;
        let state = Arc::new(StatusState {
            store: store.clone(),
            membership: membership.clone(),
            bot_name: config::BOT_NAME.clone(),
            backup_channel: config::channels::BACKUP_CHANNEL.clone(),
            database_channel_id: *config::channels::DATABASE_CHANNEL_ID,
        });
        tokio::spawn(async move {
            if let Err(e) = start_status_server(port, state).await {
                log::error!("Status server error: {}", e);
            }
        });
    } else {
        log::info!("Status server disabled (STATUS_ENABLED=false)");
    }

    let handler_deps = HandlerDeps::new(
        store,
        membership,
        sessions,
        bot_username,
        ChatId(*config::channels::DATABASE_CHANNEL_ID),
        config::channels::BACKUP_CHANNEL.clone(),
    );

    log::info!("🤖 Bot started, polling for updates");
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, schema(handler_deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
