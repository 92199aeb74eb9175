//! Academy service: the single entry point for callers.
//!
//! Owns the three repositories, applies mutations, notifies subscribers, and
//! recomputes every view on demand from the current collections. No derived
//! state is cached between calls.

use chrono::NaiveDate;
use log::{debug, info};
use shared::{
    AcademySnapshot, ActivityItem, ClassSession, CollectionKind, CreateClassSessionRequest,
    CreateStudentRequest, CreateTestResultRequest, DashboardMetrics, MonthlyReport, Student,
    StudentSummary, TestResult,
};
use std::sync::Arc;

use super::activity_feed::build_activity_feed;
use super::aggregation;
use super::clock::Clock;
use super::dates::YearMonth;
use super::errors::AcademyError;
use super::export_service::ExportService;
use super::query;
use crate::config::AcademyConfig;
use crate::storage::{
    ClassSessionRepository, KeyValueStore, StudentRepository, TestResultRepository, WriteOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added { id: String },
    Removed { id: String },
}

/// Emitted after every add or remove, whether or not it reached the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: CollectionKind,
    pub change: Change,
}

type Listener = Box<dyn Fn(&ChangeEvent)>;

pub struct AcademyService {
    students: StudentRepository,
    sessions: ClassSessionRepository,
    tests: TestResultRepository,
    clock: Arc<dyn Clock>,
    config: AcademyConfig,
    export_service: ExportService,
    listeners: Vec<Listener>,
}

impl AcademyService {
    /// Load all three collections from `store` under the configured namespace
    pub fn open(store: Arc<dyn KeyValueStore>, config: AcademyConfig, clock: Arc<dyn Clock>) -> Self {
        let namespace = config.key_namespace.clone();
        let service = Self {
            students: StudentRepository::new(store.clone(), &namespace, clock.clone()),
            sessions: ClassSessionRepository::new(store.clone(), &namespace, clock.clone()),
            tests: TestResultRepository::new(store, &namespace, clock.clone()),
            clock,
            config,
            export_service: ExportService::new(),
            listeners: Vec::new(),
        };
        info!(
            "Academy opened: {} students, {} class cards, {} test results",
            service.students.all().len(),
            service.sessions.all().len(),
            service.tests.all().len()
        );
        service
    }

    pub fn config(&self) -> &AcademyConfig {
        &self.config
    }

    /// Register a callback run after every mutation
    pub fn subscribe(&mut self, listener: impl Fn(&ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, collection: CollectionKind, change: Change) {
        let event = ChangeEvent { collection, change };
        debug!("Notifying {} listeners of {:?}", self.listeners.len(), event);
        for listener in &self.listeners {
            listener(&event);
        }
    }

    fn notify_removed(&self, collection: CollectionKind, id: &str, outcome: &WriteOutcome<bool>) {
        if outcome.value {
            self.notify(collection, Change::Removed { id: id.to_string() });
        }
    }

    // ---- mutations ----

    pub fn register_student(&mut self, request: CreateStudentRequest) -> Result<WriteOutcome<Student>, AcademyError> {
        let outcome = self.students.add(request)?;
        self.notify(
            CollectionKind::Students,
            Change::Added {
                id: outcome.value.id.clone(),
            },
        );
        Ok(outcome)
    }

    /// Delete a student. Their class cards and test results stay and are
    /// shown under the `unknown` placeholder from then on.
    pub fn delete_student(&mut self, student_id: &str) -> WriteOutcome<bool> {
        let outcome = self.students.remove(student_id);
        self.notify_removed(CollectionKind::Students, student_id, &outcome);
        outcome
    }

    pub fn log_class_session(
        &mut self,
        request: CreateClassSessionRequest,
    ) -> Result<WriteOutcome<ClassSession>, AcademyError> {
        let outcome = self.sessions.add(request)?;
        self.notify(
            CollectionKind::ClassSessions,
            Change::Added {
                id: outcome.value.id.clone(),
            },
        );
        Ok(outcome)
    }

    pub fn delete_class_session(&mut self, session_id: &str) -> WriteOutcome<bool> {
        let outcome = self.sessions.remove(session_id);
        self.notify_removed(CollectionKind::ClassSessions, session_id, &outcome);
        outcome
    }

    pub fn record_test_result(
        &mut self,
        request: CreateTestResultRequest,
    ) -> Result<WriteOutcome<TestResult>, AcademyError> {
        let outcome = self.tests.add(request)?;
        self.notify(
            CollectionKind::TestResults,
            Change::Added {
                id: outcome.value.id.clone(),
            },
        );
        Ok(outcome)
    }

    /// Re-read every collection from the store
    pub fn reload(&mut self) {
        self.students.reload();
        self.sessions.reload();
        self.tests.reload();
        info!("Academy reloaded from store");
    }

    // ---- snapshot accessors ----

    pub fn all_students(&self) -> &[Student] {
        self.students.all()
    }

    pub fn all_sessions(&self) -> &[ClassSession] {
        self.sessions.all()
    }

    pub fn all_tests(&self) -> &[TestResult] {
        self.tests.all()
    }

    pub fn find_student(&self, student_id: &str) -> Option<&Student> {
        self.students.find_by_id(student_id)
    }

    // ---- queries ----

    pub fn filter_students(&self, name_query: &str, grade: Option<&str>) -> Vec<&Student> {
        query::filter_students(self.students.all(), name_query, grade)
    }

    pub fn student_name(&self, student_id: &str) -> &str {
        query::student_name(self.students.all(), student_id)
    }

    pub fn student_summary(&self, student_id: &str) -> Result<StudentSummary, AcademyError> {
        query::student_summary(self.students.all(), self.sessions.all(), self.tests.all(), student_id)
            .ok_or_else(|| AcademyError::not_found("student", student_id))
    }

    pub fn sessions_for_student(&self, student_id: &str) -> Vec<&ClassSession> {
        query::sessions_for_student(self.sessions.all(), student_id)
    }

    pub fn tests_for_student(&self, student_id: &str) -> Vec<&TestResult> {
        query::tests_for_student(self.tests.all(), student_id)
    }

    pub fn sessions_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ClassSession> {
        query::sessions_in_range(self.sessions.all(), start, end)
    }

    pub fn tests_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&TestResult> {
        query::tests_in_range(self.tests.all(), start, end)
    }

    /// Newest class cards, as many as the class-card grid shows
    pub fn recent_sessions(&self) -> Vec<&ClassSession> {
        query::recent_n(self.sessions.all(), self.config.recent_sessions_limit)
    }

    /// Newest test results, as many as the score table shows
    pub fn recent_tests(&self) -> Vec<&TestResult> {
        query::recent_n(self.tests.all(), self.config.recent_tests_limit)
    }

    pub fn dashboard_metrics(&self) -> DashboardMetrics {
        aggregation::dashboard_metrics(
            self.students.all(),
            self.sessions.all(),
            self.tests.all(),
            self.clock.today(),
        )
    }

    pub fn current_month(&self) -> YearMonth {
        YearMonth::of(self.clock.today())
    }

    pub fn monthly_report(&self, student_id: &str, month: YearMonth) -> Result<MonthlyReport, AcademyError> {
        aggregation::monthly_report(
            self.students.all(),
            self.sessions.all(),
            self.tests.all(),
            student_id,
            month,
        )
    }

    pub fn activity_feed(&self) -> Vec<ActivityItem> {
        build_activity_feed(
            self.students.all(),
            self.sessions.all(),
            self.tests.all(),
            self.config.activity_feed_options(),
        )
    }

    // ---- export ----

    pub fn export_snapshot(&self) -> AcademySnapshot {
        self.export_service.snapshot(
            self.students.all(),
            self.sessions.all(),
            self.tests.all(),
            self.clock.now(),
        )
    }

    pub fn export_students_csv(&self) -> anyhow::Result<String> {
        self.export_service.students_csv(self.students.all())
    }

    pub fn export_sessions_csv(&self) -> anyhow::Result<String> {
        self.export_service.sessions_csv(self.students.all(), self.sessions.all())
    }

    pub fn export_tests_csv(&self) -> anyhow::Result<String> {
        self.export_service.tests_csv(self.students.all(), self.tests.all())
    }
}
