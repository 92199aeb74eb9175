//! # Academy Records Backend
//!
//! Local record keeping for a tutoring academy: students, class cards
//! (one per tutoring session) and test scores, kept in a key-value store and
//! summarized as a dashboard, an activity feed and monthly reports.
//!
//! ## Architecture
//!
//! ```text
//! Caller (CLI, UI, export adapter)
//!     ↓
//! IO Layer (form input conversion)
//!     ↓
//! Domain Layer (AcademyService, queries, aggregation)
//!     ↓
//! Storage Layer (repositories, JSON collections, key-value store)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

pub use config::AcademyConfig;
pub use domain::{AcademyError, AcademyService};
