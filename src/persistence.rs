//! Persistence: the local-storage equivalent and the adapter the stores use
//!
//! The cart core never sees storage failures. [`KeyValueStore`] has an
//! infallible surface (misses are `None`, write errors are swallowed with a
//! warning), and [`PersistenceAdapter::load`] falls back to the empty default
//! state when the persisted payload does not deserialize.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key for the serialized cart state.
pub const CART_STORAGE_KEY: &str = "cart";
/// Storage key for the serialized wishlist state.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Synchronous string key-value store, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Typed load/save seam injected into the stores. Both operations are
/// synchronous and never fail from the caller's point of view.
pub trait PersistenceAdapter<S> {
    fn load(&self) -> S;
    fn save(&self, state: &S);
}

/// In-memory key-value store; the test fake, also handy as a session-scoped
/// store when nothing should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }
}

/// File-per-key store under a directory. I/O failures are logged and
/// swallowed; a missing or unreadable file is simply a miss.
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        std::fs::write(self.path(key), value)
            .with_context(|| format!("writing key {key}"))?;
        Ok(())
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.write(key, value) {
            tracing::warn!(key, %err, "dropping persisted write");
        }
    }
}

/// Generic adapter binding a state type to one key of a [`KeyValueStore`].
/// The same shape serves the cart and the wishlist under separate keys.
pub struct KvPersistence<S> {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    _state: PhantomData<fn() -> S>,
}

impl<S> KvPersistence<S> {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into(), _state: PhantomData }
    }
}

impl<S: Default + Serialize + DeserializeOwned> PersistenceAdapter<S> for KvPersistence<S> {
    fn load(&self) -> S {
        let Some(raw) = self.kv.get(&self.key) else {
            return S::default();
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "persisted state unreadable, starting empty");
                S::default()
            }
        }
    }

    fn save(&self, state: &S) {
        match serde_json::to_string(state) {
            Ok(raw) => self.kv.set(&self.key, &raw),
            Err(err) => tracing::warn!(key = %self.key, %err, "state not serializable, skipping save"),
        }
    }
}
