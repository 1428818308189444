//! List view synchronizer.
//!
//! # Responsibility
//! - Own the authoritative in-memory item list while the list view is active.
//! - Load it from the durable snapshot (or seed it) whenever the view gains
//!   focus, and persist it after every mutation.
//!
//! # Invariants
//! - A failed load leaves the in-memory list untouched.
//! - A failed persist does not roll back the in-memory mutation.
//! - A load result is applied only if no other load or mutation started
//!   while it was in flight.
//! - A load reads only after every persist queued before it has finished.
//! - Persists are queued by the repository and snapshot the list only when
//!   they reach the head of the queue.

use crate::model::id::IdGenerator;
use crate::model::item::{max_id, seed_items, Item, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use crate::service::navigation::NavigationRequest;
use crate::store::ItemStore;
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Result of one `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A non-empty persisted list replaced the in-memory list.
    Restored { count: usize },
    /// Nothing (or an empty list) was persisted; the seed list was installed.
    Seeded { count: usize },
    /// A newer load or a mutation started first; this result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct ListState {
    items: Vec<Item>,
    generation: u64,
}

/// Authoritative list for the list view.
pub struct ListSynchronizer<S: ItemStore> {
    repo: Arc<ItemRepository<S>>,
    ids: IdGenerator,
    state: Mutex<ListState>,
}

impl<S: ItemStore> ListSynchronizer<S> {
    /// Creates an empty synchronizer; call `load` before showing the list.
    pub fn new(repo: Arc<ItemRepository<S>>) -> Self {
        Self {
            repo,
            ids: IdGenerator::new(),
            state: Mutex::new(ListState::default()),
        }
    }

    /// Current list, newest first.
    pub fn items(&self) -> Vec<Item> {
        self.lock_state().items.clone()
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.lock_state()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Reloads the list from storage.
    ///
    /// Call whenever the list view becomes visible: the editor may have
    /// changed the durable snapshot in the meantime. The read waits behind
    /// persists that are still in flight. When seeding, the seed list stays
    /// installed and `Seeded` is returned even if writing it back fails; the
    /// next successful persist stores it.
    ///
    /// # Errors
    /// - Storage and decode failures on read; the previous list is kept.
    pub async fn load(&self) -> RepoResult<LoadOutcome> {
        let started_at = Instant::now();
        let generation = self.begin_change();
        info!("event=list_load module=list_sync status=start generation={generation}");

        let snapshot = self.repo.load_snapshot_queued().await.map_err(|err| {
            error!(
                "event=list_load module=list_sync status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            err
        })?;

        let (items, seeded) = match snapshot {
            Some(items) if !items.is_empty() => (items, false),
            _ => (seed_items(), true),
        };
        let count = items.len();

        {
            let mut state = self.lock_state();
            if state.generation != generation {
                info!(
                    "event=list_load module=list_sync status=superseded generation={generation} current={}",
                    state.generation
                );
                return Ok(LoadOutcome::Superseded);
            }
            if let Some(highest) = max_id(&items) {
                self.ids.observe(highest);
            }
            state.items = items;
        }

        info!(
            "event=list_load module=list_sync status=ok seeded={seeded} count={count} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        if seeded {
            if let Err(err) = self.persist().await {
                warn!(
                    "event=list_seed module=list_sync status=error count={count} error={err}"
                );
            }
            return Ok(LoadOutcome::Seeded { count });
        }
        Ok(LoadOutcome::Restored { count })
    }

    /// Prepends a new open item and persists.
    ///
    /// # Errors
    /// - Persist failure; the item stays at the head of the in-memory list.
    pub async fn add(&self, title: impl Into<String>) -> RepoResult<Item> {
        let item = Item::new(self.ids.next_id(), title);
        {
            let mut state = self.lock_state();
            state.generation += 1;
            state.items.insert(0, item.clone());
        }
        info!("event=list_add module=list_sync status=ok id={}", item.id);

        self.persist().await?;
        Ok(item)
    }

    /// Flips `completed` on the matching item and persists.
    ///
    /// An id that is not in the list changes nothing, so nothing is written:
    /// returns `Ok(false)` and leaves the store as it was.
    pub async fn toggle_completed(&self, id: ItemId) -> RepoResult<bool> {
        let toggled = self.mutate(|items| {
            items
                .iter_mut()
                .find(|item| item.id == id)
                .map(Item::toggle)
                .is_some()
        });
        if !toggled {
            debug!("event=list_toggle module=list_sync status=not_found id={id}");
            return Ok(false);
        }

        info!("event=list_toggle module=list_sync status=ok id={id}");
        self.persist().await?;
        Ok(true)
    }

    /// Removes the matching item and persists.
    ///
    /// An id that is not in the list changes nothing, so nothing is written:
    /// returns `Ok(false)` and leaves the store as it was.
    pub async fn delete(&self, id: ItemId) -> RepoResult<bool> {
        let removed = self.mutate(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            items.len() != before
        });
        if !removed {
            debug!("event=list_delete module=list_sync status=not_found id={id}");
            return Ok(false);
        }

        info!("event=list_delete module=list_sync status=ok id={id}");
        self.persist().await?;
        Ok(true)
    }

    /// Writes the current in-memory list to storage.
    pub async fn persist(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.repo.replace_all_with(|| self.items()).await {
            Ok(count) => {
                debug!(
                    "event=list_persist module=list_sync status=ok count={count} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=list_persist module=list_sync status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Requests the editor view for `id`.
    pub fn open_editor(&self, id: ItemId) -> NavigationRequest {
        NavigationRequest::OpenEditor(id)
    }

    fn begin_change(&self) -> u64 {
        let mut state = self.lock_state();
        state.generation += 1;
        state.generation
    }

    /// Applies `change`; bumps the generation only when it reports a change.
    fn mutate(&self, change: impl FnOnce(&mut Vec<Item>) -> bool) -> bool {
        let mut state = self.lock_state();
        let changed = change(&mut state.items);
        if changed {
            state.generation += 1;
        }
        changed
    }

    fn lock_state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
