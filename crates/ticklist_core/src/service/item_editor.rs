//! Single-item editor synchronizer.
//!
//! # Responsibility
//! - Load one item from the durable snapshot into an edit buffer.
//! - Commit the edited buffer back into the persisted list.
//!
//! # Invariants
//! - Only `title` is editable; `id` and `completed` are carried unchanged.
//! - `save` replaces exactly one entry through the repository's queued
//!   read-modify-write and never writes when the id is no longer persisted.
//! - Every finished save requests `NavigationRequest::Back`, found or not.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use crate::service::navigation::NavigationRequest;
use crate::store::ItemStore;
use log::{error, info, warn};
use std::sync::Arc;

/// Editor lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Loading,
    /// `None` when the item could not be found or read.
    Ready(Option<Item>),
    Saving(Item),
    Done,
}

/// Result of a finished `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The persisted entry was replaced.
    Saved,
    /// The id was not in the persisted list; nothing was written.
    NotFound,
    /// No item was loaded into the buffer; nothing was written.
    NothingToSave,
}

impl SaveOutcome {
    pub fn navigation(self) -> NavigationRequest {
        NavigationRequest::Back
    }
}

/// Edit buffer for one item, independent of the list view's copy.
pub struct ItemEditor<S: ItemStore> {
    repo: Arc<ItemRepository<S>>,
    state: EditorState,
}

impl<S: ItemStore> ItemEditor<S> {
    pub fn new(repo: Arc<ItemRepository<S>>) -> Self {
        Self {
            repo,
            state: EditorState::Loading,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Item in the edit buffer, if one is loaded.
    pub fn item(&self) -> Option<&Item> {
        match &self.state {
            EditorState::Ready(item) => item.as_ref(),
            EditorState::Saving(item) => Some(item),
            EditorState::Loading | EditorState::Done => None,
        }
    }

    /// Reads the persisted list and buffers the item with `id`.
    ///
    /// Not-found leaves the buffer empty. Read failures also leave it empty
    /// and are returned so the caller can decide whether to surface them.
    pub async fn load_item(&mut self, id: ItemId) -> RepoResult<Option<Item>> {
        self.state = EditorState::Loading;
        match self.repo.get_by_id(id).await {
            Ok(found) => {
                if found.is_none() {
                    warn!("event=editor_load module=item_editor status=not_found id={id}");
                } else {
                    info!("event=editor_load module=item_editor status=ok id={id}");
                }
                self.state = EditorState::Ready(found.clone());
                Ok(found)
            }
            Err(err) => {
                error!("event=editor_load module=item_editor status=error id={id} error={err}");
                self.state = EditorState::Ready(None);
                Err(err)
            }
        }
    }

    /// Replaces the buffered title. No persistence side effect.
    ///
    /// Returns `false` when no item is buffered.
    pub fn edit_title(&mut self, title: impl Into<String>) -> bool {
        match &mut self.state {
            EditorState::Ready(Some(item)) => {
                item.title = title.into();
                true
            }
            _ => false,
        }
    }

    /// Writes the buffered item back into the persisted list.
    ///
    /// # Errors
    /// - Storage and decode failures; the state returns to `Ready` with the
    ///   buffer intact so `save` can be called again.
    pub async fn save(&mut self) -> RepoResult<SaveOutcome> {
        let item = match &self.state {
            EditorState::Ready(Some(item)) => item.clone(),
            _ => {
                self.state = EditorState::Done;
                return Ok(SaveOutcome::NothingToSave);
            }
        };

        self.state = EditorState::Saving(item.clone());
        match self.repo.update(&item).await {
            Ok(true) => {
                info!("event=editor_save module=item_editor status=ok id={}", item.id);
                self.state = EditorState::Done;
                Ok(SaveOutcome::Saved)
            }
            Ok(false) => {
                warn!(
                    "event=editor_save module=item_editor status=not_found id={}",
                    item.id
                );
                self.state = EditorState::Done;
                Ok(SaveOutcome::NotFound)
            }
            Err(err) => {
                error!(
                    "event=editor_save module=item_editor status=error id={} error={err}",
                    item.id
                );
                self.state = EditorState::Ready(Some(item));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorState, ItemEditor, SaveOutcome};
    use crate::model::item::ItemId;
    use crate::repo::item_repo::ItemRepository;
    use crate::service::navigation::NavigationRequest;
    use crate::store::memory_store::MemoryItemStore;
    use std::sync::Arc;

    fn editor_over(json: Option<&str>) -> ItemEditor<MemoryItemStore> {
        let store = match json {
            Some(json) => MemoryItemStore::with_entry("todos", json),
            None => MemoryItemStore::new(),
        };
        ItemEditor::new(Arc::new(ItemRepository::new(store, "todos")))
    }

    #[tokio::test]
    async fn absent_snapshot_gives_empty_ready_state() {
        let mut editor = editor_over(None);
        assert_eq!(editor.state(), &EditorState::Loading);

        assert!(editor.load_item(ItemId(1)).await.unwrap().is_none());
        assert_eq!(editor.state(), &EditorState::Ready(None));
        assert!(!editor.edit_title("ignored"));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_reported_and_buffer_stays_empty() {
        let mut editor = editor_over(Some("[{"));
        assert!(editor.load_item(ItemId(1)).await.is_err());
        assert_eq!(editor.item(), None);
    }

    #[tokio::test]
    async fn saving_without_buffer_still_navigates_back() {
        let mut editor = editor_over(Some("[]"));
        editor.load_item(ItemId(3)).await.unwrap();

        let outcome = editor.save().await.unwrap();
        assert_eq!(outcome, SaveOutcome::NothingToSave);
        assert_eq!(outcome.navigation(), NavigationRequest::Back);
        assert_eq!(editor.state(), &EditorState::Done);
    }
}
