//! Redirect configuration persistence
//!
//! [`StoredConfigProvider`] keeps the configuration as a JSON document under a
//! single key of a [`KeyValueStore`]. Reads are never cached, so a save is
//! visible to the very next intercepted call.

use crate::domain::RedirectConfig;
use crate::infrastructure::log_messages::store;
use crate::interception::ports::{ConfigProvider, StoreError};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Minimal string key-value persistence
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Key-value store backed by one JSON object in a file.
///
/// A missing file reads as empty. Writes go to a sibling temporary file that
/// is renamed over the original.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// [`ConfigProvider`] over a [`KeyValueStore`]
pub struct StoredConfigProvider<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StoredConfigProvider<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> ConfigProvider for StoredConfigProvider<S> {
    fn get(&self) -> RedirectConfig {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "{}", store::MISSING);
                return RedirectConfig::default();
            }
            Err(error) => {
                warn!(key = %self.key, error = %error, "{}", store::UNREADABLE);
                return RedirectConfig::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => {
                debug!(key = %self.key, "{}", store::LOADED);
                config
            }
            Err(error) => {
                warn!(key = %self.key, error = %error, "{}", store::UNREADABLE);
                RedirectConfig::default()
            }
        }
    }

    fn set(&self, config: RedirectConfig) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&config)?;
        self.store.set(&self.key, raw)?;
        debug!(key = %self.key, target_address = %config.target_address, "{}", store::WRITTEN);
        Ok(())
    }
}

/// In-process [`ConfigProvider`], mainly for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<RedirectConfig>,
}

impl MemoryConfigProvider {
    pub fn new(config: RedirectConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get(&self) -> RedirectConfig {
        self.config.read().clone()
    }

    fn set(&self, config: RedirectConfig) -> Result<(), StoreError> {
        *self.config.write() = config;
        Ok(())
    }
}
