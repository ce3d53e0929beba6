//! Per-slot admission locks.
//!
//! A slot is a hall and session, plus the calendar day when capacity is
//! tracked per day. Entries are created on first use and dropped again once
//! no task holds or waits on them, so the table only ever contains slots
//! with admissions in flight.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::models::booking_model::Session;

use super::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub hall_id: ObjectId,
    pub session: Session,
    pub day: Option<NaiveDate>,
}

type LockTable = HashMap<SlotKey, Arc<AsyncMutex<()>>>;

#[derive(Clone, Default)]
pub struct SlotLocks {
    table: Arc<Mutex<LockTable>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    // The table lock is never held across an await.
    fn table(&self) -> MutexGuard<'_, LockTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits up to `timeout` for exclusive access to `key`.
    pub async fn acquire(&self, key: SlotKey, timeout: Duration) -> BookingResult<SlotGuard> {
        let slot = self.table().entry(key).or_default().clone();

        match tokio::time::timeout(timeout, slot.lock_owned()).await {
            Ok(guard) => Ok(SlotGuard {
                key,
                guard: Some(guard),
                locks: self.clone(),
            }),
            Err(_) => {
                debug!(hall = %key.hall_id, session = %key.session, "Timed out waiting for slot lock");
                self.prune(&key);
                Err(BookingError::Busy)
            }
        }
    }

    /// Removes the entry for `key` if the table holds the only reference.
    fn prune(&self, key: &SlotKey) {
        let mut table = self.table();
        if table
            .get(key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            table.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

/// Exclusive hold on one slot; released on drop.
pub struct SlotGuard {
    key: SlotKey,
    guard: Option<OwnedMutexGuard<()>>,
    locks: SlotLocks,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // Release first so the pruning check sees our reference gone.
        self.guard.take();
        self.locks.prune(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(session: Session) -> SlotKey {
        SlotKey {
            hall_id: ObjectId::new(),
            session,
            day: None,
        }
    }

    #[tokio::test]
    async fn second_acquire_times_out_while_held() {
        let locks = SlotLocks::new();
        let key = key(Session::Night);

        let guard = locks.acquire(key, Duration::from_millis(50)).await.unwrap();
        let err = locks.acquire(key, Duration::from_millis(20)).await;
        assert!(matches!(err, Err(BookingError::Busy)));
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.is_empty());
        let _again = locks.acquire(key, Duration::from_millis(20)).await.unwrap();
    }

    #[tokio::test]
    async fn distinct_slots_do_not_block_each_other() {
        let locks = SlotLocks::new();
        let hall_id = ObjectId::new();
        let morning = SlotKey { hall_id, session: Session::Morning, day: None };
        let night = SlotKey { hall_id, session: Session::Night, day: None };

        let _a = locks.acquire(morning, Duration::from_millis(20)).await.unwrap();
        let _b = locks.acquire(night, Duration::from_millis(20)).await.unwrap();
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn waiter_keeps_entry_alive_until_done() {
        let locks = SlotLocks::new();
        let key = key(Session::Evening);

        let guard = locks.acquire(key, Duration::from_secs(1)).await.unwrap();
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(key, Duration::from_secs(5)).await.unwrap();
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        // the waiter still references the entry
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
