//! JSON load/save on top of a key-value store
//!
//! Persistence is best-effort: missing keys, read failures, and malformed
//! JSON all load as the default value, and write failures are logged and
//! dropped. The game keeps running either way.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::platform::KeyValueStore;

/// Load a value, falling back to `T::default()` on any problem
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => {
            log::info!("No saved data under {}, using defaults", key);
            return T::default();
        }
        Err(e) => {
            log::warn!("{}", e);
            return T::default();
        }
    };

    match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed data under {}: {}", key, e);
            T::default()
        }
    }
}

/// Save a value; returns whether it was written
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> bool
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to serialize {}: {}", key, e);
            return false;
        }
    };

    match store.set(key, &json) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryStore, StorageError};
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        value: u32,
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_string(),
                reason: "denied".into(),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        assert!(save(&mut store, "sample", &Sample { value: 7 }));
        let loaded: Sample = load_or_default(&store, "sample");
        assert_eq!(loaded, Sample { value: 7 });
    }

    #[test]
    fn test_missing_and_malformed_load_default() {
        let mut store = MemoryStore::new();
        let missing: Sample = load_or_default(&store, "sample");
        assert_eq!(missing, Sample::default());

        store.set("sample", "{not json").unwrap();
        let malformed: Sample = load_or_default(&store, "sample");
        assert_eq!(malformed, Sample::default());
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut store = BrokenStore;
        let loaded: Sample = load_or_default(&store, "sample");
        assert_eq!(loaded, Sample::default());
        assert!(!save(&mut store, "sample", &Sample { value: 1 }));
    }
}
