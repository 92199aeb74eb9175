//! Test utilities: a throwaway data directory plus request builders.
//!
//! The temp directory is removed when the [`TestEnvironment`] is dropped,
//! even if the test panics.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use shared::{CreateClassSessionRequest, CreateStudentRequest, CreateTestResultRequest, TestType};
use std::sync::Arc;
use tempfile::{Builder, TempDir};

use super::class_session_repository::ClassSessionRepository;
use super::connection::FileStore;
use super::student_repository::StudentRepository;
use super::test_result_repository::TestResultRepository;
use crate::domain::clock::FixedClock;

pub const TEST_NAMESPACE: &str = "academy";

/// RAII test environment backed by a temp directory
pub struct TestEnvironment {
    _temp_dir: TempDir,
    pub store: Arc<FileStore>,
    /// Starts at 2024-03-15T09:00:00Z
    pub clock: Arc<FixedClock>,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = Builder::new().prefix("academy-test").tempdir()?;
        let store = Arc::new(FileStore::new(temp_dir.path())?);
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
        ));

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            store,
            clock,
        })
    }

    pub fn student_repository(&self) -> StudentRepository {
        StudentRepository::new(self.store.clone(), TEST_NAMESPACE, self.clock.clone())
    }

    pub fn class_session_repository(&self) -> ClassSessionRepository {
        ClassSessionRepository::new(self.store.clone(), TEST_NAMESPACE, self.clock.clone())
    }

    pub fn test_result_repository(&self) -> TestResultRepository {
        TestResultRepository::new(self.store.clone(), TEST_NAMESPACE, self.clock.clone())
    }
}

pub fn student_request(name: &str, grade: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        name: name.to_string(),
        grade: grade.to_string(),
        phone: "010-1234-5678".to_string(),
        parent_phone: None,
    }
}

pub fn session_request(student_id: &str, date: &str, subject: &str) -> CreateClassSessionRequest {
    CreateClassSessionRequest {
        student_id: student_id.to_string(),
        date: date.to_string(),
        subject: subject.to_string(),
        content: "Chapter 3 review".to_string(),
        homework: None,
        notes: None,
    }
}

pub fn test_request(student_id: &str, date: &str, score: i64) -> CreateTestResultRequest {
    CreateTestResultRequest {
        student_id: student_id.to_string(),
        test_type: TestType::Test,
        subject: "Math".to_string(),
        score,
        date: date.to_string(),
        memo: None,
    }
}
