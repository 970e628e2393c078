// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user critical sections.
//!
//! The dispatcher holds the owning user's lock across the whole
//! lookup-validate-handle-delete sequence. Two near-simultaneous events from
//! the same user therefore serialize: the second one runs only after the
//! first has consumed (or preserved) the waiter, which rules out
//! double-fulfillment. Locks are sharded per user id, so different users
//! never contend.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Sharded per-user advisory locks.
///
/// Map entries are evicted when the last guard for a user drops, so the map
/// tracks users with in-flight turns, not every user ever seen.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one user, waiting if another turn for the same
    /// user is in flight. The guard owns the lock for its lifetime.
    pub async fn acquire(&self, user_id: i64) -> UserGuard {
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        UserGuard {
            locks: self.locks.clone(),
            user_id,
            inner: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.locks.len()
    }
}

/// Guard over one user's critical section.
pub struct UserGuard {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
    user_id: i64,
    inner: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        // Release the mutex first, then evict the entry unless someone else
        // still holds or awaits the lock. A strong count of 1 means the map
        // is the sole remaining owner; `remove_if` checks it under the shard
        // lock `acquire` clones under, so no waiter can slip in between.
        self.inner.take();
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
