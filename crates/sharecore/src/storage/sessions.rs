//! Per-admin conversation state: the configured link timer and the files
//! collected for the next link.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::expiry::ExpiryTimer;
use crate::storage::records::StoredFile;

#[derive(Debug, Clone, Default)]
struct AdminSession {
    timer: Option<ExpiryTimer>,
    batch: Vec<StoredFile>,
}

/// user id → session. Sessions are created on first use.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<i64, AdminSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer applied to the next link `user_id` generates.
    pub async fn timer(&self, user_id: i64) -> ExpiryTimer {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .and_then(|s| s.timer)
            .unwrap_or_default()
    }

    pub async fn set_timer(&self, user_id: i64, timer: ExpiryTimer) {
        self.sessions.lock().await.entry(user_id).or_default().timer = Some(timer);
    }

    /// Drops a configured timer so the default applies again.
    pub async fn reset_timer(&self, user_id: i64) {
        if let Some(session) = self.sessions.lock().await.get_mut(&user_id) {
            session.timer = None;
        }
    }

    /// Appends a file to the pending batch and returns the new batch size.
    pub async fn push_file(&self, user_id: i64, file: StoredFile) -> usize {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(user_id).or_default();
        session.batch.push(file);
        session.batch.len()
    }

    pub async fn batch_len(&self, user_id: i64) -> usize {
        self.sessions.lock().await.get(&user_id).map_or(0, |s| s.batch.len())
    }

    /// Removes and returns the pending batch in one step, so a file pushed
    /// while the caller is still working lands in a fresh batch.
    pub async fn take_batch(&self, user_id: i64) -> Vec<StoredFile> {
        self.sessions
            .lock()
            .await
            .get_mut(&user_id)
            .map(|s| std::mem::take(&mut s.batch))
            .unwrap_or_default()
    }
}
