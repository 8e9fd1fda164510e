use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Returns the configured bot token or a configuration error when it is missing
pub fn require_bot_token() -> AppResult<String> {
    let token = BOT_TOKEN.trim();
    if token.is_empty() {
        return Err(AppError::Config(
            "BOT_TOKEN environment variable not set".to_string(),
        ));
    }
    Ok(token.to_string())
}

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: sharelink.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "sharelink.log".to_string()));

/// Display name reported by the status server
/// Read from BOT_NAME environment variable
pub static BOT_NAME: Lazy<String> =
    Lazy::new(|| env::var("BOT_NAME").unwrap_or_else(|_| "Media Share Bot".to_string()));

/// Storage channels configuration
pub mod channels {
    use once_cell::sync::Lazy;
    use std::env;

    /// Default database channel id, used when DATABASE_CHANNEL_ID is unset
    pub const DEFAULT_DATABASE_CHANNEL_ID: i64 = -1002678155201;

    /// Default backup channel username, used when BACKUP_CHANNEL is unset
    pub const DEFAULT_BACKUP_CHANNEL: &str = "baapBolbey";

    /// Private channel every uploaded file is copied into
    /// Read from DATABASE_CHANNEL_ID environment variable
    pub static DATABASE_CHANNEL_ID: Lazy<i64> = Lazy::new(|| {
        env::var("DATABASE_CHANNEL_ID")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_DATABASE_CHANNEL_ID)
    });

    /// Public channel users must join before redeeming a code (username, no `@`)
    /// Read from BACKUP_CHANNEL environment variable
    pub static BACKUP_CHANNEL: Lazy<String> = Lazy::new(|| {
        env::var("BACKUP_CHANNEL")
            .ok()
            .map(|raw| normalize_channel_username(&raw))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKUP_CHANNEL.to_string())
    });

    /// Strips surrounding whitespace and a leading `@`
    pub fn normalize_channel_username(raw: &str) -> String {
        raw.trim().trim_start_matches('@').to_string()
    }
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// Default admin user id, used when neither ADMIN_IDS nor ADMIN_USER_ID is set
    pub const DEFAULT_ADMIN_USER_ID: i64 = 1524529804;

    pub fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMIN_IDS environment variable
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default()
    });

    /// Primary admin user ID
    /// Read from ADMIN_USER_ID or fallback to first ADMIN_IDS entry
    pub static ADMIN_USER_ID: Lazy<i64> = Lazy::new(|| {
        env::var("ADMIN_USER_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .or_else(|| ADMIN_IDS.first().copied())
            .unwrap_or(DEFAULT_ADMIN_USER_ID)
    });

    /// Check if user is admin
    pub fn is_admin(user_id: i64) -> bool {
        is_admin_in(&ADMIN_IDS, *ADMIN_USER_ID, user_id)
    }

    /// Admin check against an explicit id list, falling back to the primary admin
    pub fn is_admin_in(admin_ids: &[i64], primary: i64, user_id: i64) -> bool {
        if !admin_ids.is_empty() {
            return admin_ids.contains(&user_id);
        }
        primary != 0 && primary == user_id
    }
}

/// Access code configuration
pub mod codes {
    /// Number of characters in a generated access code
    pub const CODE_LENGTH: usize = 6;

    /// Attempts made to draw a code that is not already stored
    pub const MAX_GENERATION_ATTEMPTS: usize = 16;
}

/// Link expiry configuration
pub mod expiry {
    /// Default lifetime of a generated link (2 days)
    pub const DEFAULT_MINUTES: i64 = 2880;

    /// Longest lifetime an admin may configure (1 week)
    pub const MAX_MINUTES: i64 = 10080;
}

/// Status server configuration
pub mod status {
    use once_cell::sync::Lazy;
    use std::env;

    /// Enable the JSON status HTTP server
    /// Read from STATUS_ENABLED environment variable
    /// Default: true
    pub static ENABLED: Lazy<bool> = Lazy::new(|| match env::var("STATUS_ENABLED") {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            log::warn!("Unrecognized STATUS_ENABLED value {:?}, keeping the status server enabled", raw);
            true
        }),
        Err(_) => true,
    });

    /// Reads the usual on/off spellings (`true`/`1`/`yes`/`on` and their
    /// opposites), ignoring case and surrounding whitespace.
    pub fn parse_flag(raw: &str) -> Option<bool> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// Port for the status HTTP server
    /// Read from STATUS_PORT environment variable
    /// Default: 5000
    pub static PORT: Lazy<u16> = Lazy::new(|| {
        env::var("STATUS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000)
    });
}

/// Telegram limits
pub mod telegram {
    /// Maximum caption length accepted by the Bot API
    pub const MAX_CAPTION_LENGTH: usize = 1024;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Startup configuration
pub mod startup {
    use super::Duration;

    /// Attempts made to reach the Bot API before giving up
    pub const MAX_GET_ME_RETRIES: u32 = 12;

    /// Delay between get_me attempts (in seconds)
    pub const GET_ME_RETRY_DELAY_SECS: u64 = 5;

    pub fn get_me_retry_delay() -> Duration {
        Duration::from_secs(GET_ME_RETRY_DELAY_SECS)
    }
}

/// Bot API server configuration utilities
pub mod bot_api {
    /// Returns the BOT_API_URL environment variable if set.
    pub fn get_url() -> Option<String> {
        std::env::var("BOT_API_URL").ok().filter(|url| !url.trim().is_empty())
    }
}
