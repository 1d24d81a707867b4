//! Key-value storage backends
//!
//! The trait mirrors the browser `Storage` API: string keys, string values,
//! `&self` receivers. Reads never fail (an unreadable value is absent);
//! writes surface their failure.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{RecordError, Result};

pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// Stand-in when no persistent storage exists: reads are empty, writes fail
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(RecordError::StorageUnavailable)
    }
}

/// In-memory storage with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            quota: Some(bytes),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .items
                .borrow()
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(RecordError::StorageWrite(format!(
                    "quota exceeded ({} of {} bytes)",
                    needed, quota
                )));
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when the page has no LocalStorage (disabled, sandboxed iframe)
    pub fn new() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        use wasm_bindgen::JsCast;

        self.storage.set_item(key, value).map_err(|e| {
            let message = match e.dyn_ref::<js_sys::Error>() {
                Some(err) => String::from(err.message()),
                None => format!("{:?}", e),
            };
            RecordError::StorageWrite(message)
        })
    }
}

/// One `<key>.json` file per key inside a data directory (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let write_err = |e: std::io::Error| {
            RecordError::StorageWrite(format!("{}: {}", path.display(), e))
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        // Write beside the target then rename so a failed write keeps the old blob
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(write_err)?;
        std::fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get_set() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k"), None);
        storage.set_item("k", "v1").unwrap();
        storage.set_item("k", "v2").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_memory_quota_rejects_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "short").unwrap();

        let err = storage.set_item("k", "much too long").unwrap_err();
        assert!(matches!(err, RecordError::StorageWrite(_)));
        assert_eq!(storage.get_item("k").as_deref(), Some("short"));
    }

    #[test]
    fn test_memory_quota_counts_replacement_not_sum() {
        // Replacing a value only counts the new size
        let storage = MemoryStorage::with_quota(6);
        storage.set_item("k", "12345").unwrap();
        storage.set_item("k", "abcde").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("abcde"));
    }

    #[test]
    fn test_unavailable_storage_rejects_writes() {
        let storage = UnavailableStorage;
        assert_eq!(storage.get_item("k"), None);
        let err = storage.set_item("k", "v").unwrap_err();
        assert!(matches!(err, RecordError::StorageUnavailable));
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let storage: Box<dyn KeyValueStorage> = Box::new(MemoryStorage::new());
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "case-conf-storage-{}-{}",
            std::process::id(),
            line!()
        ));
        let storage = FileStorage::new(&dir);
        assert_eq!(storage.get_item("students"), None);

        storage.set_item("students", "[]").unwrap();
        assert_eq!(storage.get_item("students").as_deref(), Some("[]"));
        assert!(dir.join("students.json").exists());
        assert!(!dir.join("students.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
