//! # Storage Module
//!
//! Persistence for the academy's three collections.
//!
//! - **traits**: the [`KeyValueStore`] abstraction, the only I/O boundary
//! - **connection**: [`FileStore`], one JSON file per key in a data directory
//! - **memory_store**: [`MemoryStore`], in-process store for tests and scratch use
//! - **collection**: versioned JSON codec and the generic [`JsonCollection`]
//! - **\*_repository**: typed repositories that validate, stamp and append records
//!
//! Loading never fails: a missing, corrupted or foreign value yields an empty
//! collection. Writes that fail are reported through [`WriteOutcome`] while
//! the in-memory change stays in place.

pub mod class_session_repository;
pub mod collection;
pub mod connection;
pub mod memory_store;
pub mod student_repository;
pub mod test_result_repository;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use class_session_repository::ClassSessionRepository;
pub use collection::{JsonCollection, Record, WriteOutcome};
pub use connection::FileStore;
pub use memory_store::MemoryStore;
pub use student_repository::StudentRepository;
pub use test_result_repository::TestResultRepository;
pub use traits::KeyValueStore;
