mod config;
pub mod database;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{ConfigError, StorageError};

/// Key under which the completed session count is stored.
pub const COUNTER_KEY: &str = "pomodoro_sessions";

/// Returns `~/.config/pomotick[-dev]/` based on POMOTICK_ENV.
///
/// Set POMOTICK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotick-dev")
    } else {
        base_dir.join("pomotick")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// String-keyed persistence used by the timer engine.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the persisted session count. Missing, unreadable, or malformed
/// values all count as zero.
pub fn load_count(store: &dyn KvStore) -> u64 {
    match store.get(COUNTER_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "ignoring malformed session count");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!(error = %e, "session count unavailable, starting from zero");
            0
        }
    }
}

/// Persist the session count as a decimal string.
pub fn save_count(store: &dyn KvStore, count: u64) -> Result<(), StorageError> {
    store.set(COUNTER_KEY, &count.to_string())
}
