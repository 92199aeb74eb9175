use log::{info, warn};
use shared::{ClassSession, CreateClassSessionRequest};
use std::sync::Arc;

use super::collection::{JsonCollection, WriteOutcome};
use super::traits::KeyValueStore;
use crate::domain::clock::Clock;
use crate::domain::errors::{AcademyError, ValidationError};
use crate::domain::validation::{normalize_optional, require_date, require_text};

/// Class cards, in the order they were written
pub struct ClassSessionRepository {
    collection: JsonCollection<ClassSession>,
    clock: Arc<dyn Clock>,
}

impl ClassSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: JsonCollection::open(store, namespace),
            clock,
        }
    }

    /// Log a session. The student is not required to exist.
    pub fn add(&mut self, request: CreateClassSessionRequest) -> Result<WriteOutcome<ClassSession>, AcademyError> {
        let student_id = require_text(&request.student_id, ValidationError::EmptyStudentId)?;
        let date = require_date("date", &request.date)?;
        let subject = require_text(&request.subject, ValidationError::EmptySubject)?;

        let session = ClassSession {
            id: self.collection.fresh_id(),
            student_id,
            date,
            subject,
            content: request.content,
            homework: normalize_optional(request.homework),
            notes: normalize_optional(request.notes),
            created_at: self.clock.now().to_rfc3339(),
        };

        info!(
            "Logging class session {} for student {}: {} on {}",
            session.id, session.student_id, session.subject, session.date
        );
        let outcome = self.collection.push(session);
        if !outcome.is_durable() {
            warn!("Class session {} logged but not saved", outcome.value.id);
        }
        Ok(outcome)
    }

    pub fn remove(&mut self, session_id: &str) -> WriteOutcome<bool> {
        let outcome = self.collection.remove(session_id);
        if outcome.value {
            info!("Deleted class session: {}", session_id);
        }
        outcome
    }

    pub fn find_by_id(&self, session_id: &str) -> Option<&ClassSession> {
        self.collection.find(session_id)
    }

    pub fn all(&self) -> &[ClassSession] {
        self.collection.all()
    }

    pub fn reload(&mut self) {
        self.collection.reload();
    }
}
