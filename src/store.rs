use std::cell::RefCell;
use std::collections::BTreeMap;

use log::warn;
use web_sys::Storage;

use crate::error::SiteError;
use crate::model::LocalData;
use crate::DATA_STORAGE_KEY;

/// Injected storage service. Components never touch storage keys ambiently,
/// so tests can substitute [`MemoryStore`] for the browser backend.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SiteError>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-memory fake for tests. `capacity` bounds the total stored bytes so
/// quota exhaustion can be provoked deterministically.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            items: RefCell::new(BTreeMap::new()),
            capacity: Some(capacity),
        }
    }

    fn stored_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        if let Some(capacity) = self.capacity {
            let existing = self
                .items
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            if self.stored_bytes() - existing + key.len() + value.len() > capacity {
                return Err(SiteError::QuotaExceeded);
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.items.borrow().keys().cloned().collect()
    }
}

/// Browser local storage. Persists across sessions until explicitly cleared;
/// `set_item` rejection is surfaced as quota exhaustion, the only write
/// failure browsers report in practice.
pub struct BrowserStore {
    storage: Storage,
}

impl BrowserStore {
    pub fn from_window() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(BrowserStore { storage })
    }
}

impl Store for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        self.storage
            .set_item(key, value)
            .map_err(|_err| SiteError::QuotaExceeded)
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }

    fn keys(&self) -> Vec<String> {
        let len = self.storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|index| self.storage.key(index).ok().flatten())
            .collect()
    }
}

/// Parse the persisted bundle, surfacing corrupt JSON to the caller.
pub fn try_load_bundle(store: &dyn Store) -> Result<LocalData, SiteError> {
    match store.get(DATA_STORAGE_KEY) {
        None => Ok(LocalData::default()),
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|err| SiteError::StorageParse(err.to_string()))
        }
    }
}

/// Bundle load with the recovery policy applied: a corrupt blob is logged
/// and treated as empty, never deleted. An older schema under a different
/// versioned key is simply invisible.
pub fn load_bundle(store: &dyn Store) -> LocalData {
    match try_load_bundle(store) {
        Ok(bundle) => bundle,
        Err(err) => {
            warn!("{}", err);
            LocalData::default()
        }
    }
}

/// Whole-value serialize and write; there is no partial-write risk because
/// the store API only replaces complete values.
pub fn save_bundle(store: &dyn Store, bundle: &LocalData) -> Result<(), SiteError> {
    let raw =
        serde_json::to_string(bundle).map_err(|err| SiteError::StorageParse(err.to_string()))?;
    store.set(DATA_STORAGE_KEY, &raw)
}
