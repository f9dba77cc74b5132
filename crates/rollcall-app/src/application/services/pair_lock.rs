use rollcall_domain::shared::{EventId, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type PairKey = (UserId, EventId);

/// One async lock per (user, event) pair.
///
/// Check-ins for different pairs never wait on each other. Entries nobody
/// holds or waits on are dropped the next time a lock is handed out.
#[derive(Default)]
pub struct PairLocks {
    locks: Mutex<HashMap<PairKey, Arc<AsyncMutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the pair's lock. It is released when the guard drops.
    pub async fn lock(&self, user_id: &UserId, event_id: &EventId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.retain(|_, slot| Arc::strong_count(slot) > 1);
            locks
                .entry((user_id.clone(), event_id.clone()))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }

    /// Pairs currently locked or waited on.
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
