//! Users known to have joined the backup channel.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Set of user ids that passed the backup-channel check. Never evicted, so a
/// user who leaves the channel later keeps access until the process restarts.
#[derive(Clone, Default)]
pub struct MembershipCache {
    users: Arc<Mutex<HashSet<i64>>>,
}

impl MembershipCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, user_id: i64) -> bool {
        self.users.lock().await.contains(&user_id)
    }

    /// Marks `user_id` as joined. Returns true when the user was not cached yet.
    pub async fn insert(&self, user_id: i64) -> bool {
        let inserted = self.users.lock().await.insert(user_id);
        if inserted {
            log::info!("User {} verified as backup channel member", user_id);
        }
        inserted
    }

    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}
