//! Per-resource async locks
//!
//! Serializes occupy/release decisions for a single table so a release
//! never races an order being placed on the same table.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct ResourceLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = self.locks.entry(key.to_string()).or_default().clone();
        mutex.lock_owned().await
    }
}
