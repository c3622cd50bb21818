//! In-memory collaborators for local runs and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::{RiskRecord, WatchListEntry};
use crate::infra::{Result, RiskError, RiskStore, WatchList};

/// Append-only record store kept in process memory.
#[derive(Default)]
pub struct MemoryRiskStore {
    records: RwLock<Vec<RiskRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryRiskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail; reads still work.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RiskStore for MemoryRiskStore {
    async fn write(&self, record: &RiskRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RiskError::Persistence("store is read-only".into()));
        }
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn read_latest(&self, subject_id: &str) -> Result<Option<RiskRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.subject_id == subject_id)
            .cloned())
    }

    async fn read_history(
        &self,
        subject_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<RiskRecord>> {
        let page_size = page_size.max(1) as usize;
        let skip = (page.max(1) as usize - 1) * page_size;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.subject_id == subject_id)
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect())
    }
}

/// Watch list backed by a fixed map.
#[derive(Default)]
pub struct StaticWatchList {
    entries: HashMap<String, WatchListEntry>,
}

impl StaticWatchList {
    pub fn new(entries: impl IntoIterator<Item = WatchListEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.imo.clone(), e)).collect(),
        }
    }
}

#[async_trait]
impl WatchList for StaticWatchList {
    async fn lookup(&self, imo: &str) -> Result<Option<WatchListEntry>> {
        Ok(self.entries.get(imo.trim()).cloned())
    }
}
