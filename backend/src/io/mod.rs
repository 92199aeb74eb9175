//! # IO Module
//!
//! Boundary between whatever collects input (forms, a CLI, a sync adapter)
//! and the domain. Raw string fields are converted into typed create
//! requests here; the domain never sees unparsed input.

pub mod form_input;

pub use form_input::{parse_score, ClassSessionForm, StudentForm, TestResultForm};
