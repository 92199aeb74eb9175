use log::{info, warn};
use shared::{CreateTestResultRequest, TestResult};
use std::sync::Arc;

use super::collection::{JsonCollection, WriteOutcome};
use super::traits::KeyValueStore;
use crate::domain::clock::Clock;
use crate::domain::errors::{AcademyError, ValidationError};
use crate::domain::validation::{normalize_optional, require_date, require_text};

/// Test, homework and online-test scores, in the order they were recorded
pub struct TestResultRepository {
    collection: JsonCollection<TestResult>,
    clock: Arc<dyn Clock>,
}

impl TestResultRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: JsonCollection::open(store, namespace),
            clock,
        }
    }

    /// Record a score. Out-of-range scores are stored as given.
    pub fn add(&mut self, request: CreateTestResultRequest) -> Result<WriteOutcome<TestResult>, AcademyError> {
        let student_id = require_text(&request.student_id, ValidationError::EmptyStudentId)?;
        let subject = require_text(&request.subject, ValidationError::EmptySubject)?;
        let date = require_date("date", &request.date)?;

        let result = TestResult {
            id: self.collection.fresh_id(),
            student_id,
            test_type: request.test_type,
            subject,
            score: request.score,
            date,
            memo: normalize_optional(request.memo),
            created_at: self.clock.now().to_rfc3339(),
        };

        info!(
            "Recording {} result {} for student {}: {} = {}",
            result.test_type, result.id, result.student_id, result.subject, result.score
        );
        let outcome = self.collection.push(result);
        if !outcome.is_durable() {
            warn!("Test result {} recorded but not saved", outcome.value.id);
        }
        Ok(outcome)
    }

    /// Administrative cleanup; not offered through the academy service
    pub fn remove(&mut self, result_id: &str) -> WriteOutcome<bool> {
        let outcome = self.collection.remove(result_id);
        if outcome.value {
            info!("Deleted test result: {}", result_id);
        }
        outcome
    }

    pub fn find_by_id(&self, result_id: &str) -> Option<&TestResult> {
        self.collection.find(result_id)
    }

    pub fn all(&self) -> &[TestResult] {
        self.collection.all()
    }

    pub fn reload(&mut self) {
        self.collection.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::{test_request, TestEnvironment};
    use shared::TestType;

    #[test]
    fn test_add_keeps_score_and_type_verbatim() {
        let env = TestEnvironment::new().unwrap();
        let mut repo = env.test_result_repository();

        let mut request = test_request("student::1", "2024-03-02", 130);
        request.test_type = TestType::from("oral");
        let result = repo.add(request).unwrap().value;

        assert!(result.id.starts_with("test_result::"));
        assert_eq!(result.score, 130);
        assert_eq!(result.test_type.as_str(), "oral");

        let reopened = env.test_result_repository();
        assert_eq!(reopened.all(), &[result]);
    }

    #[test]
    fn test_add_requires_student_subject_and_date() {
        let env = TestEnvironment::new().unwrap();
        let mut repo = env.test_result_repository();

        assert!(repo.add(test_request(" ", "2024-03-02", 90)).is_err());
        assert!(repo.add(test_request("student::1", "soon", 90)).is_err());
        let mut request = test_request("student::1", "2024-03-02", 90);
        request.subject = String::new();
        assert!(matches!(
            repo.add(request),
            Err(AcademyError::Validation(ValidationError::EmptySubject))
        ));
        assert!(repo.all().is_empty());
    }

    #[test]
    fn test_remove_for_cleanup() {
        let env = TestEnvironment::new().unwrap();
        let mut repo = env.test_result_repository();
        let kept = repo.add(test_request("student::1", "2024-03-02", 70)).unwrap().value;
        let mistake = repo.add(test_request("student::1", "2024-03-02", 7)).unwrap().value;

        assert!(repo.remove(&mistake.id).value);
        assert!(!repo.remove(&mistake.id).value);
        assert_eq!(env.test_result_repository().all(), &[kept]);
    }

    #[test]
    fn test_ids_stay_unique_across_many_adds() {
        let env = TestEnvironment::new().unwrap();
        let mut repo = env.test_result_repository();
        for score in 0..100 {
            repo.add(test_request("student::1", "2024-03-02", score)).unwrap();
        }
        let mut ids: Vec<&str> = repo.all().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }
}
