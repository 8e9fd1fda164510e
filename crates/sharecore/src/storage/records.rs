//! Access records: code → stored media, kept in process memory.
//!
//! Records are only removed lazily, when a lookup finds them past their expiry.
//! There is no background sweep and nothing survives a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumString};
use tokio::sync::Mutex;

use crate::core::codes::{generate_unique_code, is_valid_code};
use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::expiry::ExpiryTimer;
use crate::core::links::LinkKind;

/// Kind of media a file reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

/// A Telegram file id together with how it has to be sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_id: String,
    pub kind: MediaKind,
}

impl StoredFile {
    pub fn new(file_id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            file_id: file_id.into(),
            kind,
        }
    }
}

/// What a code resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccessPayload {
    Single(StoredFile),
    Batch { files: Vec<StoredFile> },
}

impl AccessPayload {
    /// Files in delivery order.
    pub fn files(&self) -> &[StoredFile] {
        match self {
            AccessPayload::Single(file) => std::slice::from_ref(file),
            AccessPayload::Batch { files } => files,
        }
    }

    /// File copied into the database channel for this payload.
    pub fn first(&self) -> Option<&StoredFile> {
        self.files().first()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    pub fn link_kind(&self) -> LinkKind {
        match self {
            AccessPayload::Single(_) => LinkKind::Media,
            AccessPayload::Batch { .. } => LinkKind::Batch,
        }
    }
}

/// Metadata stored under an access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub code: String,
    /// Message in the database channel holding the (first) file. Left out of
    /// the metadata JSON, which is written into that very message.
    #[serde(skip)]
    pub message_id: i32,
    #[serde(flatten)]
    pub payload: AccessPayload,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessRecord {
    pub fn new(
        code: impl Into<String>,
        message_id: i32,
        payload: AccessPayload,
        timer: ExpiryTimer,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            message_id,
            payload,
            created_at: now,
            expires_at: timer.expires_at(now),
        }
    }

    /// A record is live while its expiry lies strictly in the future.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Compact JSON form, appended to the database channel caption.
    pub fn metadata_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Shared code → record map.
#[derive(Clone, Default)]
pub struct AccessStore {
    records: Arc<Mutex<HashMap<String, AccessRecord>>>,
}

impl AccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a code that is not currently stored.
    pub async fn fresh_code(&self) -> String {
        let records = self.records.lock().await;
        generate_unique_code(config::codes::CODE_LENGTH, |code| records.contains_key(code))
    }

    /// Stores `record`, returning whatever was stored under the same code before.
    pub async fn insert(&self, record: AccessRecord) -> Option<AccessRecord> {
        let mut records = self.records.lock().await;
        records.insert(record.code.clone(), record)
    }

    /// Generates a fresh code and stores a record for it in one step.
    pub async fn create(
        &self,
        message_id: i32,
        payload: AccessPayload,
        timer: ExpiryTimer,
        now: DateTime<Utc>,
    ) -> AccessRecord {
        let mut records = self.records.lock().await;
        let code = generate_unique_code(config::codes::CODE_LENGTH, |code| records.contains_key(code));
        let record = AccessRecord::new(code, message_id, payload, timer, now);
        records.insert(record.code.clone(), record.clone());
        record
    }

    /// Looks a code up, removing it when it has expired.
    ///
    /// # Errors
    /// * `Validation` - the code contains characters a generated code never has
    /// * `NotFound` - nothing stored under the code
    /// * `Expired` - the record was past its expiry and has been removed
    pub async fn lookup(&self, code: &str, now: DateTime<Utc>) -> AppResult<AccessRecord> {
        if !is_valid_code(code) {
            return Err(AppError::Validation(format!("malformed access code {:?}", code)));
        }

        let mut records = self.records.lock().await;
        let Some(record) = records.get(code).cloned() else {
            return Err(AppError::NotFound(code.to_string()));
        };
        if record.is_expired(now) {
            records.remove(code);
            return Err(AppError::Expired(code.to_string()));
        }
        Ok(record)
    }

    /// Metadata for `code` while it is live, `None` otherwise.
    pub async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Option<AccessRecord> {
        match self.lookup(code, now).await {
            Ok(record) => {
                log::info!("Retrieved media metadata for code: {}", code);
                Some(record)
            }
            Err(AppError::Expired(_)) => {
                log::info!("Media with code {} has expired and was removed", code);
                None
            }
            Err(e) => {
                log::info!("Media with code {} not available: {}", code, e);
                None
            }
        }
    }

    pub async fn contains(&self, code: &str) -> bool {
        self.records.lock().await.contains_key(code)
    }

    /// Number of stored records, expired-but-unread ones included.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
