//! SQLite-backed item store.
//!
//! # Responsibility
//! - Persist key/value snapshots in the `kv_entries` table.
//! - Keep blocking SQLite calls off the async executor threads.
//!
//! # Invariants
//! - One row per key; `set` replaces the row in a single statement.
//! - The connection is only touched from the blocking pool under its mutex.

use super::{ItemStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key/value store over one SQLite connection.
#[derive(Clone)]
pub struct SqliteItemStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteItemStore {
    /// Opens the store file at `path`, creating and migrating it if needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::unavailable(operation, "store connection poisoned"))?;
            work(&*guard).map_err(|err| StoreError::unavailable(operation, err))
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(join_err) => Err(StoreError::unavailable(operation, join_err)),
        };
        if let Err(err) = &result {
            error!("event=store_{operation} module=store status=error error={err}");
        }
        result
    }
}

#[async_trait]
impl ItemStore for SqliteItemStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key = key.to_string();
        let value = self
            .run_blocking("get", move |conn| {
                conn.query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .map_err(DbError::from)
            })
            .await?;
        debug!(
            "event=store_get module=store status=ok present={}",
            value.is_some()
        );
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let key = key.to_string();
        let value = value.to_string();
        let bytes = value.len();
        self.run_blocking("set", move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
            Ok(())
        })
        .await?;
        debug!("event=store_set module=store status=ok bytes={bytes}");
        Ok(())
    }
}
