//! Durable key/value store contract consumed by the repository.
//!
//! # Responsibility
//! - Define the async get/set boundary over one string-keyed blob.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `get` returns `Ok(None)` for a key that was never written.
//! - A successful `set` is durable before the future resolves.
//! - Concurrent `set` calls on one key resolve last-write-wins.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory_store;
pub mod sqlite_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of the underlying storage medium.
#[derive(Debug)]
pub enum StoreError {
    /// The medium could not be read or the write could not be committed.
    Unavailable {
        operation: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn unavailable(
        operation: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable {
            operation,
            source: source.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { operation, source } => {
                write!(f, "storage unavailable during {operation}: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Async key/value persistence for serialized snapshots.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: ItemStore + ?Sized> ItemStore for Arc<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }
}
