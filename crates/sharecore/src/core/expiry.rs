//! Link lifetime: admin-configurable timer in minutes

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

use crate::core::config;

/// Rejected `/admin timer` values. The display strings are sent to the admin as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("❌ Please provide a valid number.")]
    InvalidNumber,
    #[error("❌ Timer must be positive.")]
    NotPositive,
    #[error("❌ Maximum timer is {} minutes (1 week).", config::expiry::MAX_MINUTES)]
    TooLong,
}

/// Lifetime of a generated link, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiryTimer(i64);

impl ExpiryTimer {
    pub const DEFAULT: ExpiryTimer = ExpiryTimer(config::expiry::DEFAULT_MINUTES);
    pub const MAX: ExpiryTimer = ExpiryTimer(config::expiry::MAX_MINUTES);

    /// Validates a minute count: positive and at most one week.
    pub fn from_minutes(minutes: i64) -> Result<Self, TimerError> {
        if minutes <= 0 {
            return Err(TimerError::NotPositive);
        }
        if minutes > Self::MAX.0 {
            return Err(TimerError::TooLong);
        }
        Ok(Self(minutes))
    }

    /// Parses the argument of `/admin timer <minutes>`.
    pub fn parse(arg: &str) -> Result<Self, TimerError> {
        let minutes: i64 = arg.trim().parse().map_err(|_| TimerError::InvalidNumber)?;
        Self::from_minutes(minutes)
    }

    pub fn minutes(self) -> i64 {
        self.0
    }

    /// Expiry instant for a link created at `now`.
    pub fn expires_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(self.0)
    }
}

impl Default for ExpiryTimer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ExpiryTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_minutes(self.0))
    }
}

/// Formats minutes as `2h 30m`, `2h` or `45m`.
pub fn format_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if hours > 0 && remaining > 0 {
        format!("{}h {}m", hours, remaining)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Formats an expiry instant the way captions and replies show it.
pub fn format_expiry(at: DateTime<Utc>) -> String {
    format!("{} UTC", at.format("%Y-%m-%d %H:%M:%S"))
}
