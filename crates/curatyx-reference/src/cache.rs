//! Per-entity reference table cache.
//!
//! Holds at most one loaded table. The first `get_or_load` fills the slot;
//! later calls share the same `Arc<Table>` until `invalidate` empties it.
//! A failed load leaves the slot empty so the next call retries.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use curatyx_common::{Result, Table};
use tracing::debug;

/// A loaded reference table and when it was loaded.
#[derive(Debug, Clone)]
pub struct CachedReference {
    pub table: Arc<Table>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ReferenceCache {
    slot: RwLock<Option<CachedReference>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached table, if loaded.
    pub fn get(&self) -> Option<Arc<Table>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| Arc::clone(&cached.table))
    }

    /// Return the cached table, running `load` to fill the slot if empty.
    ///
    /// `load` runs at most once across concurrent callers of a cold cache.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<Table>>
    where
        F: FnOnce() -> Result<Table>,
    {
        if let Some(table) = self.get() {
            debug!("Reference cache hit");
            return Ok(table);
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled it while we waited for the write lock.
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(&cached.table));
        }

        let table = Arc::new(load()?);
        *slot = Some(CachedReference {
            table: Arc::clone(&table),
            loaded_at: Utc::now(),
        });
        Ok(table)
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.loaded_at)
    }

    /// Drop the cached table. Returns whether anything was cached.
    pub fn invalidate(&self) -> bool {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}
