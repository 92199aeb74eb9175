//! # Domain Module
//!
//! Business rules for the academy: validation, derived views and the
//! service callers talk to. Nothing here touches the filesystem directly;
//! persistence goes through the repositories in `storage`.
//!
//! ## Module Organization
//!
//! - **academy_service**: the facade owning the repositories, with change notifications
//! - **query**: filters, joins, date ranges and recent-N slices over record slices
//! - **aggregation**: dashboard metrics and the monthly per-student report
//! - **activity_feed**: merged recent activity across the three collections
//! - **export_service**: snapshot and CSV tables for spreadsheet adapters
//! - **dates** / **clock**: calendar-date handling and the time source
//! - **validation** / **errors**: field checks and the error types
//!
//! ## Business Rules
//!
//! - Students, class cards and test results are append-only lists in insertion order
//! - A student id on a class card or test result is a weak reference; deleting a
//!   student never cascades, and unresolved names show as `unknown`
//! - Dates compare as the calendar date written by the user
//! - Scores are kept exactly as entered, out-of-range values included

pub mod academy_service;
pub mod activity_feed;
pub mod aggregation;
pub mod clock;
pub mod dates;
pub mod errors;
pub mod export_service;
pub mod query;
pub mod validation;

pub use academy_service::{AcademyService, Change, ChangeEvent};
pub use activity_feed::ActivityFeedOptions;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::YearMonth;
pub use errors::{AcademyError, StorageError, ValidationError};
pub use export_service::ExportService;
