//! Single-blob record store over a [`KeyValueStorage`].

use crate::consts::STUDENTS_STORAGE_KEY;
use crate::error::Result;
use crate::platform::KeyValueStorage;
use crate::record::StudentRecord;

pub struct RecordStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Store under the default students key
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STUDENTS_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Load every record in storage order.
    ///
    /// Never fails: a missing key is an empty collection and a corrupt blob
    /// is logged and treated as empty.
    pub fn load(&self) -> Vec<StudentRecord> {
        let Some(json) = self.storage.get_item(&self.key) else {
            log::debug!("No stored students under '{}'", self.key);
            return Vec::new();
        };

        match serde_json::from_str::<Vec<StudentRecord>>(&json) {
            Ok(records) => {
                log::debug!("Loaded {} students", records.len());
                records
            }
            Err(e) => {
                log::error!("Failed to parse stored students: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection. Write failures are returned as-is.
    pub fn save(&self, records: &[StudentRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.storage.set_item(&self.key, &json)?;
        log::info!("Students saved ({} entries)", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use crate::platform::MemoryStorage;
    use proptest::prelude::*;

    fn alice() -> StudentRecord {
        StudentRecord {
            id: "a1".into(),
            name: "Alice".into(),
            dob: "2015-03-01".into(),
            center: "North".into(),
            teacher: "Ms. Reyes".into(),
            goals: "Reading\nWriting".into(),
            progress: "Good".into(),
            updated: "2026-10-17T09:30:00.000Z".into(),
        }
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = RecordStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = RecordStore::new(MemoryStorage::new());
        store.save(&[alice()]).unwrap();
        assert_eq!(store.load(), vec![alice()]);
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let storage = MemoryStorage::new();
        storage
            .set_item(STUDENTS_STORAGE_KEY, "{not json")
            .unwrap();
        let store = RecordStore::new(&storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_non_array_blob_loads_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(STUDENTS_STORAGE_KEY, "{}").unwrap();
        assert!(RecordStore::new(&storage).load().is_empty());
    }

    #[test]
    fn test_null_field_does_not_drop_collection() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STUDENTS_STORAGE_KEY,
                r#"[{"id":"a1","name":"Alice","dob":null,"center":"North"},{"id":"b2","name":"Bob"}]"#,
            )
            .unwrap();
        let store = RecordStore::new(&storage);

        let records = store.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].dob, "");
        assert_eq!(records[0].center, "North");
        assert_eq!(records[1].name, "Bob");
    }

    #[test]
    fn test_save_overwrites() {
        let store = RecordStore::new(MemoryStorage::new());
        store.save(&[alice()]).unwrap();
        store.save(&[]).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let storage = MemoryStorage::new();
        let a = RecordStore::with_key(&storage, "a");
        let b = RecordStore::with_key(&storage, "b");
        a.save(&[alice()]).unwrap();
        assert_eq!(a.load().len(), 1);
        assert!(b.load().is_empty());
    }

    #[test]
    fn test_quota_error_surfaces_and_keeps_previous() {
        let storage = MemoryStorage::with_quota(STUDENTS_STORAGE_KEY.len() + 2);
        let store = RecordStore::new(&storage);
        store.save(&[]).unwrap();

        let err = store.save(&[alice()]).unwrap_err();
        assert!(matches!(err, RecordError::StorageWrite(_)));
        assert!(store.load().is_empty());
        assert_eq!(storage.get_item(STUDENTS_STORAGE_KEY).as_deref(), Some("[]"));
    }

    prop_compose! {
        fn arb_record()(
            id in "[a-f0-9]{1,32}",
            name in ".{0,20}",
            dob in "[0-9/ -]{0,10}",
            center in ".{0,12}",
            teacher in ".{0,12}",
            goals in "(?s).{0,40}",
            progress in "(?s).{0,40}",
            updated in "[0-9T:.Z-]{0,24}",
        ) -> StudentRecord {
            StudentRecord { id, name, dob, center, teacher, goals, progress, updated }
        }
    }

    proptest! {
        #[test]
        fn prop_save_load_round_trip(records in proptest::collection::vec(arb_record(), 0..8)) {
            let store = RecordStore::new(MemoryStorage::new());
            store.save(&records).unwrap();
            prop_assert_eq!(store.load(), records);
        }
    }
}
