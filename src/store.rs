// src/store.rs

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone)]
struct PurchaseRecord {
    item_id: String,
    status: PurchaseStatus,
    created: Instant,
}

/// Result of a status poll. `Completed` is only ever observed once per
/// purchase: returning it deletes the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCheck {
    NotFound,
    Pending,
    Completed { item_id: String },
}

impl StatusCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCheck::NotFound => "not_found",
            StatusCheck::Pending => "pending",
            StatusCheck::Completed { .. } => "completed",
        }
    }
}

/// Thread-safe in-memory table of in-flight purchases, at most one per user.
///
/// Shared between the webhook handlers and the bot handlers; every
/// read-modify-write runs under a single write guard, and nothing awaits
/// external I/O while a guard is held.
#[derive(Default, Clone)]
pub struct PurchaseStore {
    inner: Arc<RwLock<HashMap<String, PurchaseRecord>>>,
}

impl PurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites the record for `user_id` as `pending`.
    /// A re-initiation replaces any prior record; there is no purchase queue.
    pub async fn put(&self, user_id: &str, item_id: &str) {
        let mut records = self.inner.write().await;
        records.insert(
            user_id.to_string(),
            PurchaseRecord {
                item_id: item_id.to_string(),
                status: PurchaseStatus::Pending,
                created: Instant::now(),
            },
        );
    }

    /// Marks the user's record `completed`. Returns `false` when no record
    /// exists (payment landed after a restart or a TTL sweep); callers decide
    /// how loudly to report that.
    ///
    /// If the paid item disagrees with the stored one the paid item wins:
    /// money moved for it.
    pub async fn mark_completed(&self, user_id: &str, item_id: &str) -> bool {
        let mut records = self.inner.write().await;
        match records.get_mut(user_id) {
            Some(record) => {
                if record.item_id != item_id {
                    log::warn!(
                        "paid item_id={} does not match pending item_id={} for user_id={}",
                        item_id,
                        record.item_id,
                        user_id
                    );
                    record.item_id = item_id.to_string();
                }
                record.status = PurchaseStatus::Completed;
                true
            }
            None => false,
        }
    }

    /// Atomic read-once consumption: a `completed` record is returned and
    /// deleted in one step, so two racing polls cannot both observe it.
    /// A `pending` record is left in place.
    pub async fn consume_if_completed(&self, user_id: &str) -> StatusCheck {
        let mut records = self.inner.write().await;
        match records.entry(user_id.to_string()) {
            Entry::Occupied(entry) if entry.get().status == PurchaseStatus::Completed => {
                let record = entry.remove();
                StatusCheck::Completed {
                    item_id: record.item_id,
                }
            }
            Entry::Occupied(_) => StatusCheck::Pending,
            Entry::Vacant(_) => StatusCheck::NotFound,
        }
    }

    /// Drops `pending` records older than `ttl` and returns how many were
    /// removed. Completed records are exempt: the polling client still gets
    /// its one delivery.
    pub async fn purge_stale(&self, ttl: Duration) -> usize {
        let mut records = self.inner.write().await;
        let before = records.len();
        records.retain(|_, record| {
            record.status != PurchaseStatus::Pending || record.created.elapsed() < ttl
        });
        before - records.len()
    }
}
