//! Test stores for failure injection and out-of-order completion.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use ticklist_core::{ItemStore, MemoryItemStore, StoreError, StoreResult};
use tokio::sync::oneshot;

pub const KEY: &str = "todos";

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryItemStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn with_snapshot(json: &str) -> Self {
        Self {
            inner: MemoryItemStore::with_entry(KEY, json),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn raw(&self) -> Option<String> {
        self.inner.get(KEY).await.unwrap()
    }

    pub async fn put_raw(&self, value: &str) {
        self.inner.set(KEY, value).await.unwrap();
    }
}

#[async_trait]
impl ItemStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("get", "disk detached"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("set", "disk full"));
        }
        self.inner.set(key, value).await
    }
}

/// Memory store that can hold a `get` response or a `set` until released.
///
/// A held read carries the data as it was when the read started. A held
/// write lands only after release.
#[derive(Default)]
pub struct GatedStore {
    inner: MemoryItemStore,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    set_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl GatedStore {
    pub fn with_snapshot(json: &str) -> Self {
        Self {
            inner: MemoryItemStore::with_entry(KEY, json),
            ..Self::default()
        }
    }

    /// Holds the next `get` until the returned sender fires (or drops).
    pub fn hold_next_get(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.lock().unwrap().push_back(gate);
        release
    }

    /// Holds the next `set` until the returned sender fires (or drops).
    pub fn hold_next_set(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.set_gates.lock().unwrap().push_back(gate);
        release
    }

    pub fn pending_gates(&self) -> usize {
        self.gates.lock().unwrap().len()
    }

    pub async fn put_raw(&self, value: &str) {
        self.inner.set(KEY, value).await.unwrap();
    }

    /// Yields until every queued gate has been picked up by a `get`.
    pub async fn wait_until_held(&self) {
        while self.pending_gates() > 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Yields until every queued `set` gate has been picked up.
    pub async fn wait_until_set_held(&self) {
        while !self.set_gates.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.inner.get(KEY).await.unwrap()
    }
}

#[async_trait]
impl ItemStore for GatedStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self.inner.get(key).await;
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        value
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let gate = self.set_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.inner.set(key, value).await
    }
}
