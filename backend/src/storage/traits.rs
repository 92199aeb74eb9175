//! # Storage Traits
//!
//! The persistent store is a plain string key-value map. Everything above it
//! (collections, repositories, services) only ever talks to this trait, so a
//! directory of JSON files and an in-memory map are interchangeable.

use crate::domain::errors::StorageError;

/// Key-value store holding one serialized blob per key
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
