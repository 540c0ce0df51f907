//! Local durable cache port.
//!
//! The immediate-availability persistence layer the store writes through
//! on every mutation, independent of remote hydration. Implementations
//! must never fail loudly: a cache write that cannot complete is logged
//! and dropped, because store mutations are total.

use std::sync::Mutex;

use crate::record::ProgressRecord;

/// Key-value blob store for the full progress record.
pub trait LocalCache: Send + Sync {
    /// Read the cached record, if any.
    fn load(&self) -> Option<ProgressRecord>;

    /// Persist the record. Best effort; failures are swallowed by the
    /// implementation (with a log line), never surfaced to mutations.
    fn store(&self, record: &ProgressRecord);
}

/// In-memory cache for tests and cache-less sessions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: Mutex<Option<ProgressRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored (0 or 1); handy in assertions.
    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }
}

impl LocalCache for MemoryCache {
    fn load(&self) -> Option<ProgressRecord> {
        self.slot.lock().unwrap().clone()
    }

    fn store(&self, record: &ProgressRecord) {
        *self.slot.lock().unwrap() = Some(record.clone());
    }
}
