//! Core of the media sharing bot: configuration, access codes, link expiry,
//! the in-memory stores and the JSON status server.
//!
//! Nothing here talks to Telegram except the `AppError::Telegram` variant,
//! which is only compiled with the `telegram` feature.

pub mod core;
pub mod storage;
