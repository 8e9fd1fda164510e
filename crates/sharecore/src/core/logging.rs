//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup diagnostics for the channel and admin configuration

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective channel/admin configuration at application startup.
///
/// The bot token is never printed, only whether it is present.
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("📦 Media share configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if config::BOT_TOKEN.trim().is_empty() {
        log::error!("❌ BOT_TOKEN: not set");
    } else {
        log::info!("✅ BOT_TOKEN: set");
    }

    log::info!("🗄  Database channel: {}", *config::channels::DATABASE_CHANNEL_ID);
    log::info!("📢 Backup channel: @{}", *config::channels::BACKUP_CHANNEL);

    if config::admin::ADMIN_IDS.is_empty() {
        log::info!("👤 Admin: {}", *config::admin::ADMIN_USER_ID);
    } else {
        log::info!("👤 Admins: {:?}", *config::admin::ADMIN_IDS);
    }

    if let Some(url) = config::bot_api::get_url() {
        log::info!("🌐 Bot API URL: {}", url);
    }

    if *config::status::ENABLED {
        log::info!("🩺 Status server port: {}", *config::status::PORT);
    } else {
        log::info!("🩺 Status server disabled (STATUS_ENABLED=false)");
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
