//! Item repository bound to one store key.
//!
//! # Responsibility
//! - Provide `get_all`/`get_by_id`/`add`/`update`/`remove` over the JSON
//!   snapshot stored under a fixed key.
//! - Serialize writers so concurrent read-modify-write cycles cannot lose
//!   each other's changes.
//!
//! # Invariants
//! - Write paths hold `write_queue` from their read through their `set`.
//! - `update`/`remove` on an unknown id issue no write.
//! - An absent snapshot reads as an empty list for item-level operations.

use crate::codec::{decode_snapshot, encode, CodecError};
use crate::model::item::{Item, ItemId};
use crate::store::{ItemStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot reads and writes.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying store could not be read or written.
    Storage(StoreError),
    /// Persisted snapshot could not be decoded (or the list could not be encoded).
    Codec(CodecError),
    /// `add` was called with an id already present in the snapshot.
    DuplicateId(ItemId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "item id already exists: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<CodecError> for RepoError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Persistence-owning service for the item list.
pub struct ItemRepository<S: ItemStore> {
    store: S,
    key: String,
    write_queue: Mutex<()>,
}

impl<S: ItemStore> ItemRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_queue: Mutex::new(()),
        }
    }

    /// Store key holding the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the snapshot, keeping "never persisted" distinct from empty.
    ///
    /// Returns `Ok(None)` when the key is absent or blank.
    pub async fn load_snapshot(&self) -> RepoResult<Option<Vec<Item>>> {
        let raw = self.store.get(&self.key).await?;
        Ok(decode_snapshot(raw.as_deref())?)
    }

    /// Like `load_snapshot`, but waits behind every write already queued.
    ///
    /// A reload that must not observe a snapshot older than a pending
    /// persist reads through here.
    pub async fn load_snapshot_queued(&self) -> RepoResult<Option<Vec<Item>>> {
        let _turn = self.write_queue.lock().await;
        self.load_snapshot().await
    }

    /// Returns every persisted item; empty when nothing was persisted.
    pub async fn get_all(&self) -> RepoResult<Vec<Item>> {
        Ok(self.load_snapshot().await?.unwrap_or_default())
    }

    pub async fn get_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|item| item.id == id))
    }

    /// Prepends one item to the persisted list.
    ///
    /// # Errors
    /// - `RepoError::DuplicateId` when the id is already persisted.
    pub async fn add(&self, item: Item) -> RepoResult<()> {
        let _turn = self.write_queue.lock().await;
        let mut items = self.get_all().await?;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(RepoError::DuplicateId(item.id));
        }

        let id = item.id;
        items.insert(0, item);
        self.write(&items).await?;
        info!("event=repo_add module=repo status=ok id={id} count={}", items.len());
        Ok(())
    }

    /// Replaces the persisted entry whose id matches `item.id`.
    ///
    /// Returns `false` without writing when the id is not persisted.
    pub async fn update(&self, item: &Item) -> RepoResult<bool> {
        let _turn = self.write_queue.lock().await;
        let mut items = self.get_all().await?;
        let Some(slot) = items.iter_mut().find(|existing| existing.id == item.id) else {
            warn!(
                "event=repo_update module=repo status=not_found id={}",
                item.id
            );
            return Ok(false);
        };

        *slot = item.clone();
        self.write(&items).await?;
        info!("event=repo_update module=repo status=ok id={}", item.id);
        Ok(true)
    }

    /// Removes the persisted entry with `id`.
    ///
    /// Returns `false` without writing when the id is not persisted.
    pub async fn remove(&self, id: ItemId) -> RepoResult<bool> {
        let _turn = self.write_queue.lock().await;
        let mut items = self.get_all().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            debug!("event=repo_remove module=repo status=not_found id={id}");
            return Ok(false);
        }

        self.write(&items).await?;
        info!("event=repo_remove module=repo status=ok id={id} count={}", items.len());
        Ok(true)
    }

    /// Overwrites the snapshot with the list produced by `snapshot`.
    ///
    /// `snapshot` runs only after this call reaches the head of the write
    /// queue, so the last queued call always writes the newest state.
    /// Returns the number of items written.
    pub async fn replace_all_with<F>(&self, snapshot: F) -> RepoResult<usize>
    where
        F: FnOnce() -> Vec<Item>,
    {
        let _turn = self.write_queue.lock().await;
        let items = snapshot();
        self.write(&items).await?;
        Ok(items.len())
    }

    async fn write(&self, items: &[Item]) -> RepoResult<()> {
        let text = encode(items)?;
        self.store.set(&self.key, &text).await?;
        Ok(())
    }
}
