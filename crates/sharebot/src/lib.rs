//! Telegram bot that stores admin uploads in a private channel and hands out
//! short-lived `/start` links to them.
//!
//! The domain logic lives in `sharecore`; this crate wires it to teloxide.

pub mod cli;
pub mod telegram;
