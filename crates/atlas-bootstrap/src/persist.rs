//! Persists selected UI preferences to durable storage.
//!
//! [`PersistedUiStateSync`] observes committed mutations and writes the
//! sidebar collapse map under [`UI_SETTINGS_SLOT`] whenever a sidebar
//! mutation is committed. Other mutations never touch storage.

use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{
    AppState, Mutation, MutationSubscriber, MutationType, SidebarState, StateContainer,
};

/// Storage slot holding the persisted UI settings.
pub const UI_SETTINGS_SLOT: &str = "uiSettings";

/// Mutation types that trigger a write of the UI settings.
pub const PERSISTED_MUTATIONS: [MutationType; 2] = [
    MutationType::ToggleSidebarSectionCollapsedState,
    MutationType::SetSidebarSectionCollapsedState,
];

/// Errors raised by durable storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a slot failed.
    #[error("failed to read storage slot '{key}' at {path}: {source}")]
    Read {
        /// Slot name.
        key: String,
        /// Backing file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing a slot failed.
    #[error("failed to write storage slot '{key}' at {path}: {source}")]
    Write {
        /// Slot name.
        key: String,
        /// Backing file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Key/value storage that outlives the process.
pub trait DurableStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage keeping one JSON file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: Utf8PathBuf,
}

impl FileStorage {
    /// Stores slots under `dir`, creating it on first write.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Utf8PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                path,
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, value))
            .map_err(|source| StorageError::Write {
                key: key.to_owned(),
                path,
                source,
            })
    }
}

/// Persisted UI settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Sidebar section collapse map.
    pub sidebar: SidebarState,
}

/// Writes the sidebar state to storage after sidebar mutations.
pub struct PersistedUiStateSync {
    storage: Arc<dyn DurableStorage>,
}

impl PersistedUiStateSync {
    /// Creates a sync writing to `storage`.
    #[must_use]
    pub const fn new(storage: Arc<dyn DurableStorage>) -> Self {
        Self { storage }
    }

    /// Subscribes a sync writing to `storage` on `store`.
    ///
    /// The subscription lasts for the lifetime of the store.
    pub fn install<S>(store: &mut S, storage: Arc<dyn DurableStorage>)
    where
        S: StateContainer + ?Sized,
    {
        store.subscribe(Box::new(Self::new(storage)));
    }

    /// Returns `true` when mutations of this type are persisted.
    #[must_use]
    pub fn persists(mutation_type: MutationType) -> bool {
        PERSISTED_MUTATIONS.contains(&mutation_type)
    }
}

impl std::fmt::Debug for PersistedUiStateSync {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PersistedUiStateSync")
            .finish_non_exhaustive()
    }
}

impl MutationSubscriber for PersistedUiStateSync {
    fn on_mutation(&self, mutation: &Mutation, state: &AppState) {
        if !Self::persists(mutation.mutation_type()) {
            return;
        }

        let settings = UiSettings {
            sidebar: state.sidebar().clone(),
        };
        let serialised = match serde_json::to_string(&settings) {
            Ok(serialised) => serialised,
            Err(error) => {
                tracing::warn!(
                    target: "atlas_bootstrap::persist",
                    error = %error,
                    "could not serialise UI settings"
                );
                return;
            }
        };

        // Best effort.
        if let Err(error) = self.storage.set_item(UI_SETTINGS_SLOT, &serialised) {
            tracing::warn!(
                target: "atlas_bootstrap::persist",
                mutation = %mutation.mutation_type(),
                error = %error,
                "could not persist UI settings"
            );
        }
    }
}
