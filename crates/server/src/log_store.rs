//! In-memory log buffer backing the logs endpoint

use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use tokio::sync::RwLock;
use types::utils::now_iso8601;
use uuid::Uuid;

/// Maximum number of retained entries
pub const LOG_STORE_CAPACITY: usize = 1000;

/// A log entry submitted through the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredLogEntry {
    pub id: Uuid,
    pub timestamp: String,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Bounded, newest-first log buffer
#[derive(Debug)]
pub struct LogStore {
    entries: RwLock<VecDeque<StoredLogEntry>>,
    capacity: usize,
}

impl LogStore {
    pub fn new() -> Self {
        Self::with_capacity(LOG_STORE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(LOG_STORE_CAPACITY))),
            capacity,
        }
    }

    /// Record an entry, evicting the oldest once full
    pub async fn push(&self, level: &str, message: &str, metadata: Option<Value>) -> StoredLogEntry {
        let entry = StoredLogEntry {
            id: Uuid::new_v4(),
            timestamp: now_iso8601(),
            level: level.to_string(),
            message: message.to_string(),
            metadata,
        };

        let mut entries = self.entries.write().await;
        entries.push_front(entry.clone());
        entries.truncate(self.capacity);
        entry
    }

    /// Newest entries first, optionally filtered by level.
    ///
    /// Returns at most `limit` entries and the number of entries matching the
    /// filter.
    pub async fn query(&self, level: Option<&str>, limit: usize) -> (Vec<StoredLogEntry>, usize) {
        let entries = self.entries.read().await;
        let matching: Vec<_> = entries
            .iter()
            .filter(|e| level.map_or(true, |l| e.level == l))
            .collect();
        let total = matching.len();
        let page = matching.into_iter().take(limit).cloned().collect();
        (page, total)
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
