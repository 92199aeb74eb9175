//! # JSON Collections
//!
//! An insertion-ordered list of records mirrored to a single store key.
//! Every mutation rewrites the whole collection; collections stay at
//! single-academy scale (hundreds to low thousands of rows).
//!
//! ## Stored format
//!
//! ```json
//! {"version":1,"records":[{"id":"student::...","name":"Anna",...}]}
//! ```
//!
//! Stores written before versioning hold a bare JSON array; those load as
//! version 0 and are upgraded to the envelope on the next write.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{ClassSession, CollectionKind, Student, TestResult};
use std::sync::Arc;
use uuid::Uuid;

use super::traits::KeyValueStore;
use crate::domain::errors::StorageError;

pub const SCHEMA_VERSION: u64 = 1;

/// A record that lives in one of the academy collections
pub trait Record: Serialize + DeserializeOwned + Clone {
    const COLLECTION: CollectionKind;

    fn id(&self) -> &str;
}

impl Record for Student {
    const COLLECTION: CollectionKind = CollectionKind::Students;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ClassSession {
    const COLLECTION: CollectionKind = CollectionKind::ClassSessions;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for TestResult {
    const COLLECTION: CollectionKind = CollectionKind::TestResults;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Result of a mutation whose in-memory part always succeeds.
///
/// `storage_error` is set when the collection could not be written back;
/// the change is then live for this session but will not survive a reload.
#[derive(Debug)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub storage_error: Option<StorageError>,
}

impl<T> WriteOutcome<T> {
    pub fn new(value: T, persisted: Result<(), StorageError>) -> Self {
        Self {
            value,
            storage_error: persisted.err(),
        }
    }

    pub fn is_durable(&self) -> bool {
        self.storage_error.is_none()
    }

    /// Treat a failed write as an error, dropping the value
    pub fn into_result(self) -> Result<T, StorageError> {
        match self.storage_error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u64,
    records: &'a [T],
}

/// Store key of a collection under a namespace; an empty namespace gives the
/// bare legacy key (`students`, `classCards`, `testResults`).
pub fn collection_key(namespace: &str, kind: CollectionKind) -> String {
    if namespace.is_empty() {
        kind.storage_key().to_string()
    } else {
        format!("{}.{}", namespace, kind.storage_key())
    }
}

/// Serialize records into the versioned envelope
pub fn encode_records<T: Serialize>(key: &str, records: &[T]) -> Result<String, StorageError> {
    serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        records,
    })
    .map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })
}

/// Parse a stored blob. Never fails: anything unreadable yields an empty
/// collection, and individual malformed records are skipped.
pub fn decode_records<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Stored value for '{}' is not valid JSON ({}). Starting empty.", key, e);
            return Vec::new();
        }
    };

    let items = match parsed {
        Value::Array(items) => {
            debug!("'{}' uses the unversioned layout (version 0)", key);
            items
        }
        Value::Object(mut envelope) => {
            let version = envelope.get("version").and_then(Value::as_u64).unwrap_or(0);
            if version > SCHEMA_VERSION {
                warn!(
                    "'{}' was written by a newer version (schema {} > {}). Starting empty.",
                    key, version, SCHEMA_VERSION
                );
                return Vec::new();
            }
            match envelope.remove("records") {
                Some(Value::Array(items)) => items,
                _ => {
                    warn!("'{}' has no records array. Starting empty.", key);
                    return Vec::new();
                }
            }
        }
        other => {
            warn!("'{}' holds an unexpected JSON value ({}). Starting empty.", key, type_name(&other));
            return Vec::new();
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Failed to parse record #{} of '{}': {}. Skipping.", index, key, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!("Loaded {} of {} records from '{}'", records.len(), total, key);
    }
    records
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// In-memory collection mirrored to one store key
pub struct JsonCollection<T: Record> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    records: Vec<T>,
}

impl<T: Record> JsonCollection<T> {
    /// Open the collection and load whatever the store currently holds
    pub fn open(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        let key = collection_key(namespace, T::COLLECTION);
        let records = Self::load(store.as_ref(), &key);
        info!("Loaded {} records from '{}'", records.len(), key);
        Self { store, key, records }
    }

    fn load(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
        match store.get(key) {
            Ok(Some(raw)) => decode_records(key, &raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read '{}': {}. Starting empty.", key, e);
                Vec::new()
            }
        }
    }

    /// Discard in-memory state and re-read from the store
    pub fn reload(&mut self) {
        self.records = Self::load(self.store.as_ref(), &self.key);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// A fresh `<kind>::<uuid>` id not used by any record in this collection
    pub fn fresh_id(&self) -> String {
        loop {
            let id = T::COLLECTION.generate_id(Uuid::new_v4());
            if self.find(&id).is_none() {
                return id;
            }
        }
    }

    /// Append a record and write the whole collection back
    pub fn push(&mut self, record: T) -> WriteOutcome<T> {
        self.records.push(record.clone());
        let persisted = self.persist();
        WriteOutcome::new(record, persisted)
    }

    /// Drop the record with `id`. The store is only written when something was removed.
    pub fn remove(&mut self, id: &str) -> WriteOutcome<bool> {
        let before = self.records.len();
        self.records.retain(|record| record.id() != id);
        if self.records.len() == before {
            debug!("No record '{}' in '{}', nothing to remove", id, self.key);
            return WriteOutcome::new(false, Ok(()));
        }
        let persisted = self.persist();
        WriteOutcome::new(true, persisted)
    }

    fn persist(&self) -> Result<(), StorageError> {
        encode_records(&self.key, &self.records)
            .and_then(|encoded| self.store.set(&self.key, &encoded))
            .map_err(|e| {
                warn!("Failed to persist '{}': {}. Changes are kept in memory only.", self.key, e);
                e
            })
    }
}
