//! Student record repository
//!
//! CRUD and filtering over a [`RecordStore`]. There is no cache: every call
//! reloads the collection and every write persists it whole, so the last
//! writer wins.

use crate::error::{RecordError, Result};
use crate::ids::{IdGenerator, RandomIds};
use crate::persistence::{RecordStore, export_json, parse_import};
use crate::platform::KeyValueStorage;
use crate::record::{StudentRecord, timestamp_now};
use crate::report::render_report;

pub struct RecordRepository<S, G = RandomIds> {
    store: RecordStore<S>,
    ids: G,
}

impl<S: KeyValueStorage> RecordRepository<S, RandomIds> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self::with_ids(store, RandomIds)
    }
}

impl<S: KeyValueStorage, G: IdGenerator> RecordRepository<S, G> {
    pub fn with_ids(store: RecordStore<S>, ids: G) -> Self {
        Self { store, ids }
    }

    /// Every record in storage order
    pub fn all(&self) -> Vec<StudentRecord> {
        self.store.load()
    }

    /// Create or replace a record.
    ///
    /// An empty id gets a fresh one. A matching id is replaced in place,
    /// otherwise the record is appended. Returns the record as stored.
    pub fn upsert(&mut self, mut record: StudentRecord) -> Result<StudentRecord> {
        if !record.has_id() {
            record.id = self.ids.next_id();
        }
        record.trim_fields();
        record.updated = timestamp_now();

        let mut list = self.store.load();
        match list.iter_mut().find(|s| s.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => list.push(record.clone()),
        }
        self.store.save(&list)?;
        Ok(record)
    }

    /// Remove a record. Deleting a missing id is not an error.
    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut list = self.store.load();
        let before = list.len();
        list.retain(|s| s.id != id);
        let removed = list.len() != before;
        if !removed {
            log::debug!("Delete of unknown student '{}' ignored", id);
        }
        self.store.save(&list)?;
        Ok(removed)
    }

    pub fn find_by_id(&self, id: &str) -> Result<StudentRecord> {
        self.store
            .load()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    /// Records whose name or center contains `query`, ignoring case and
    /// surrounding whitespace. An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<StudentRecord> {
        let needle = query.trim().to_lowercase();
        let mut list = self.store.load();
        list.retain(|s| s.matches(&needle));
        list
    }

    pub fn export_json(&self) -> Result<String> {
        export_json(&self.store.load())
    }

    /// Replace the whole collection with an import document.
    /// Returns the number of records imported.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let records = parse_import(text, &mut self.ids)?;
        self.store.save(&records)?;
        log::info!("Imported {} students", records.len());
        Ok(records.len())
    }

    /// Printable HTML report for one record
    pub fn report(&self, id: &str, generated_at: &str) -> Result<String> {
        let record = self.find_by_id(id)?;
        Ok(render_report(&record, generated_at))
    }
}
