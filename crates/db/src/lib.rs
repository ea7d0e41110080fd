//! `widgetdash-db` -- on-device persistence for widgets and settings.

use std::path::PathBuf;
use std::sync::Arc;

use widgetdash_core::error::CoreError;

pub mod repositories;
pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

/// Storage key of the widget collection.
pub const WIDGETS_KEY: &str = "widgets";

/// Storage key of the settings object.
pub const SETTINGS_KEY: &str = "settings";

/// Shared handle to the active storage backend.
pub type Store = Arc<dyn KeyValueStore>;

/// Errors from repository operations that validate before writing.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Open the JSON file store rooted at `data_dir`.
pub fn open_store(data_dir: impl Into<PathBuf>) -> Store {
    let store = JsonFileStore::new(data_dir);
    tracing::debug!(dir = %store.dir().display(), "Opened JSON file store");
    Arc::new(store)
}

/// Ephemeral in-memory store.
pub fn memory_store() -> Store {
    Arc::new(MemoryStore::new())
}
