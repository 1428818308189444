//! Core state and persistence for Ticklist.
//! This crate owns the item list invariants; front ends only render and route.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use codec::{decode, decode_snapshot, encode, CodecError, CodecResult};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::IdGenerator;
pub use model::item::{seed_items, Item, ItemId};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult};
pub use service::app::{OpenError, TodoApp};
pub use service::item_editor::{EditorState, ItemEditor, SaveOutcome};
pub use service::list_sync::{ListSynchronizer, LoadOutcome};
pub use service::navigation::NavigationRequest;
pub use service::theme::{ColorScheme, Palette, ThemeHandle};
pub use store::memory_store::MemoryItemStore;
pub use store::sqlite_store::SqliteItemStore;
pub use store::{ItemStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
