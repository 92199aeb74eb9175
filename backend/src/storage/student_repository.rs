use log::{info, warn};
use shared::{CreateStudentRequest, Student};
use std::sync::Arc;

use super::collection::{JsonCollection, WriteOutcome};
use super::traits::KeyValueStore;
use crate::domain::clock::Clock;
use crate::domain::dates::format_date;
use crate::domain::errors::{AcademyError, ValidationError};
use crate::domain::validation::{normalize_optional, require_text};

/// Registered students, in registration order
pub struct StudentRepository {
    collection: JsonCollection<Student>,
    clock: Arc<dyn Clock>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: JsonCollection::open(store, namespace),
            clock,
        }
    }

    /// Register a student. The registration date is the UTC date of the
    /// registration instant, the same time base as `createdAt` elsewhere.
    pub fn add(&mut self, request: CreateStudentRequest) -> Result<WriteOutcome<Student>, AcademyError> {
        let name = require_text(&request.name, ValidationError::EmptyName)?;
        let grade = require_text(&request.grade, ValidationError::EmptyGrade)?;

        let student = Student {
            id: self.collection.fresh_id(),
            name,
            grade,
            phone: request.phone.trim().to_string(),
            parent_phone: normalize_optional(request.parent_phone),
            registered_date: format_date(self.clock.now().date_naive()),
        };

        info!("Registering student: {} ({}) with ID: {}", student.name, student.grade, student.id);
        let outcome = self.collection.push(student);
        if !outcome.is_durable() {
            warn!("Student {} registered but not saved", outcome.value.id);
        }
        Ok(outcome)
    }

    /// Delete a student. Their class cards and test results are left in place.
    pub fn remove(&mut self, student_id: &str) -> WriteOutcome<bool> {
        let outcome = self.collection.remove(student_id);
        if outcome.value {
            info!("Deleted student: {}", student_id);
        }
        outcome
    }

    pub fn find_by_id(&self, student_id: &str) -> Option<&Student> {
        self.collection.find(student_id)
    }

    pub fn all(&self) -> &[Student] {
        self.collection.all()
    }

    pub fn reload(&mut self) {
        self.collection.reload();
    }
}
