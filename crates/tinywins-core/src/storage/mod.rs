//! Durable snapshot storage for the habit store.
//!
//! The whole persisted state lives under a single key as a versioned JSON
//! envelope. Backends only need to read and overwrite one string value.

mod config;
pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use config::{Config, StorageBackend, StreakAttribution};
pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::store::StoreState;

/// Key the snapshot is stored under.
pub const STORAGE_KEY: &str = "tiny-wins-storage";

/// Bump on any shape-breaking change to [`StoreState`]. There is no
/// migration: a mismatched version loads as the default state.
pub const SCHEMA_VERSION: u32 = 1;

/// A single-key durable string store.
pub trait StateStorage {
    /// Read the value under `key`, `None` when it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    state: T,
}

/// Outcome of reading the persisted snapshot.
#[derive(Debug)]
pub enum LoadedState {
    /// Stored under another schema version.
    VersionMismatch(u32),
    Loaded(Box<StoreState>),
}

/// Serialize `state` into the versioned envelope.
pub fn encode_state(state: &StoreState) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        state,
    })?)
}

/// Parse a versioned envelope.
pub fn decode_state(raw: &str) -> Result<LoadedState, StorageError> {
    #[derive(Deserialize)]
    struct VersionProbe {
        #[serde(default)]
        version: Option<u32>,
    }

    let probe: VersionProbe = serde_json::from_str(raw)?;
    match probe.version {
        Some(SCHEMA_VERSION) => {
            let envelope: Envelope<StoreState> = serde_json::from_str(raw)?;
            Ok(LoadedState::Loaded(Box::new(envelope.state)))
        }
        Some(other) => Ok(LoadedState::VersionMismatch(other)),
        None => Ok(LoadedState::VersionMismatch(0)),
    }
}

/// Returns `~/.config/tinywins[-dev]/`, or `TINYWINS_DATA_DIR` when set.
///
/// Set TINYWINS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TINYWINS_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TINYWINS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tinywins-dev")
            } else {
                base_dir.join("tinywins")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Open the backend selected in the configuration.
///
/// # Errors
/// Returns an error if the data directory or the backing store cannot be
/// opened.
pub fn open_storage(backend: StorageBackend) -> Result<Box<dyn StateStorage>> {
    let storage: Box<dyn StateStorage> = match backend {
        StorageBackend::Sqlite => Box::new(SqliteStorage::open()?),
        StorageBackend::Json => Box::new(JsonFileStorage::new(data_dir()?)),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    Ok(storage)
}
