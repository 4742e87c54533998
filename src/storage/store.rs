use std::sync::Mutex;

use crate::ingest::protocol::CollisionRecord;

/// Append-only collection of records owned exclusively by one node process.
///
/// Inserts are mutually exclusive: concurrent callers serialize on the lock,
/// no insert is lost and no interleaving corrupts the sequence. There is no
/// remove or evict operation and capacity is unbounded, so memory grows for
/// the process lifetime. That is an accepted limitation of the design and a
/// resource-exhaustion risk for long-running nodes, not something this layer
/// papers over.
#[derive(Debug, Default)]
pub struct LocalStore {
    records: Mutex<Vec<CollisionRecord>>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record under mutual exclusion.
    pub fn insert(&self, record: CollisionRecord) {
        self.lock().push(record);
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the stored sequence, in insertion order.
    pub fn snapshot(&self) -> Vec<CollisionRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CollisionRecord>> {
        // A poisoned lock still holds a valid sequence; recover it.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
