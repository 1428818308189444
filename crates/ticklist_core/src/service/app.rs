//! Application context wiring storage, repository and theme.
//!
//! Front ends build one `TodoApp` at startup and pass it (or clones of its
//! handles) to each view instead of reaching for process-wide state.

use crate::config::{ConfigError, CoreConfig};
use crate::db::DbError;
use crate::repo::item_repo::ItemRepository;
use crate::service::item_editor::ItemEditor;
use crate::service::list_sync::ListSynchronizer;
use crate::service::theme::{ColorScheme, ThemeHandle};
use crate::store::memory_store::MemoryItemStore;
use crate::store::sqlite_store::SqliteItemStore;
use crate::store::ItemStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Startup failure.
#[derive(Debug)]
pub enum OpenError {
    Config(ConfigError),
    Db(DbError),
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Db(err) => write!(f, "failed to open item store: {err}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for OpenError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for OpenError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Shared services for one application session.
pub struct TodoApp<S: ItemStore> {
    repo: Arc<ItemRepository<S>>,
    theme: ThemeHandle,
}

impl TodoApp<SqliteItemStore> {
    /// Opens the SQLite store under `config.data_dir`.
    pub fn open(config: &CoreConfig) -> Result<Self, OpenError> {
        let mut config = config.clone();
        config.validate()?;
        let store = SqliteItemStore::open(config.db_path())?;
        Ok(Self::with_store(
            store,
            config.storage_key,
            config.color_scheme,
        ))
    }
}

impl TodoApp<MemoryItemStore> {
    /// Ephemeral session; nothing survives the process.
    pub fn in_memory(color_scheme: ColorScheme) -> Self {
        Self::with_store(
            MemoryItemStore::new(),
            crate::config::DEFAULT_STORAGE_KEY,
            color_scheme,
        )
    }
}

impl<S: ItemStore> TodoApp<S> {
    pub fn with_store(store: S, storage_key: impl Into<String>, color_scheme: ColorScheme) -> Self {
        Self {
            repo: Arc::new(ItemRepository::new(store, storage_key)),
            theme: ThemeHandle::new(color_scheme),
        }
    }

    pub fn repository(&self) -> &Arc<ItemRepository<S>> {
        &self.repo
    }

    pub fn theme(&self) -> &ThemeHandle {
        &self.theme
    }

    /// Synchronizer for the list view; shares this session's repository.
    pub fn list_synchronizer(&self) -> ListSynchronizer<S> {
        ListSynchronizer::new(Arc::clone(&self.repo))
    }

    /// Fresh editor for one edit session.
    pub fn item_editor(&self) -> ItemEditor<S> {
        ItemEditor::new(Arc::clone(&self.repo))
    }
}
