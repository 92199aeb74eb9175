use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Placeholder shown wherever a weak student reference no longer resolves.
pub const UNKNOWN_STUDENT_LABEL: &str = "unknown";

/// A registered student.
///
/// Field names are camelCase on disk so stores written by earlier versions
/// of the app load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Grade-level label, free text (e.g. "중2", "Grade 8")
    pub grade: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, with = "blank_as_none")]
    pub parent_phone: Option<String>,
    /// ISO 8601 date (YYYY-MM-DD), set when the student is registered
    pub registered_date: String,
}

/// One logged tutoring session for one student ("class card").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    /// Weak reference; the student may have been deleted since
    pub student_id: String,
    /// User-chosen date or local date-time (e.g. "2024-03-05T14:30")
    pub date: String,
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "blank_as_none")]
    pub homework: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub notes: Option<String>,
    /// RFC 3339 creation timestamp, distinct from the user-chosen `date`
    pub created_at: String,
}

impl ClassSession {
    /// Homework counts as pending whenever the field holds anything but whitespace.
    pub fn has_homework(&self) -> bool {
        self.homework
            .as_deref()
            .map(|h| !h.trim().is_empty())
            .unwrap_or(false)
    }
}

/// A scored assessment entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub subject: String,
    /// Expected 0-100 but never range-checked
    pub score: i64,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    #[serde(default, with = "blank_as_none")]
    pub memo: Option<String>,
    pub created_at: String,
}

impl TestResult {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::classify(self.score)
    }
}

/// Kind of assessment. Values outside the known set are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestType {
    Test,
    Homework,
    Online,
    Other(String),
}

impl TestType {
    pub fn as_str(&self) -> &str {
        match self {
            TestType::Test => "test",
            TestType::Homework => "homework",
            TestType::Online => "online",
            TestType::Other(raw) => raw,
        }
    }
}

impl From<String> for TestType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "test" => TestType::Test,
            "homework" => TestType::Homework,
            "online" => TestType::Online,
            _ => TestType::Other(raw),
        }
    }
}

impl From<&str> for TestType {
    fn from(raw: &str) -> Self {
        TestType::from(raw.to_string())
    }
}

impl From<TestType> for String {
    fn from(test_type: TestType) -> Self {
        match test_type {
            TestType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse score classification for colouring score cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn classify(score: i64) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 60 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Which collection a record or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Students,
    ClassSessions,
    TestResults,
}

impl CollectionKind {
    /// Storage key of the collection in the legacy store layout
    pub fn storage_key(&self) -> &'static str {
        match self {
            CollectionKind::Students => "students",
            CollectionKind::ClassSessions => "classCards",
            CollectionKind::TestResults => "testResults",
        }
    }

    /// Record kind used in ids and error messages
    pub fn record_kind(&self) -> &'static str {
        match self {
            CollectionKind::Students => "student",
            CollectionKind::ClassSessions => "class_session",
            CollectionKind::TestResults => "test_result",
        }
    }

    /// Build a fresh record id, e.g. `student::6f1c...`
    pub fn generate_id(&self, uuid: Uuid) -> String {
        format!("{}::{}", self.record_kind(), uuid)
    }
}

/// Request for registering a new student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateStudentRequest {
    pub name: String,
    pub grade: String,
    pub phone: String,
    pub parent_phone: Option<String>,
}

/// Request for logging a class session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateClassSessionRequest {
    pub student_id: String,
    pub date: String,
    pub subject: String,
    pub content: String,
    pub homework: Option<String>,
    pub notes: Option<String>,
}

/// Request for recording a test result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTestResultRequest {
    pub student_id: String,
    pub test_type: TestType,
    pub subject: String,
    pub score: i64,
    pub date: String,
    pub memo: Option<String>,
}

/// Headline numbers for the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub student_count: usize,
    pub today_session_count: usize,
    pub pending_homework_count: usize,
    /// Rounded mean of every score; `None` when nothing has been recorded
    pub average_score: Option<i64>,
}

/// One student's activity within a calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub student: Student,
    /// "YYYY-MM"
    pub month: String,
    pub sessions: Vec<ClassSession>,
    pub tests: Vec<TestResult>,
    pub average_score: Option<i64>,
}

/// Counts shown when a student row is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student: Student,
    pub session_count: usize,
    pub test_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Student,
    ClassSession,
    TestResult,
}

/// Entry in the recent-activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub record_id: String,
    pub label: String,
    /// `None` when the source timestamp could not be parsed; such items sort last
    pub timestamp: Option<DateTime<Utc>>,
}

/// Read-only copy of every collection, handed to export adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademySnapshot {
    pub exported_at: String,
    pub total_students: usize,
    pub total_classes: usize,
    pub total_tests: usize,
    pub students: Vec<Student>,
    pub class_cards: Vec<ClassSession>,
    pub test_results: Vec<TestResult>,
}

/// Optional text fields are stored as `""` when absent, matching the layout
/// of stores written before records were typed.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.filter(|v| !v.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session(homework: Option<&str>) -> ClassSession {
        ClassSession {
            id: "class_session::1".to_string(),
            student_id: "student::1".to_string(),
            date: "2024-03-05T14:30".to_string(),
            subject: "Physics".to_string(),
            content: "Kinematics".to_string(),
            homework: homework.map(str::to_string),
            notes: None,
            created_at: "2024-03-05T05:31:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_generate_record_ids() {
        let uuid = Uuid::nil();
        assert_eq!(
            CollectionKind::Students.generate_id(uuid),
            "student::00000000-0000-0000-0000-000000000000"
        );
        assert!(CollectionKind::TestResults
            .generate_id(Uuid::new_v4())
            .starts_with("test_result::"));
    }

    #[test]
    fn test_storage_keys_match_legacy_layout() {
        assert_eq!(CollectionKind::Students.storage_key(), "students");
        assert_eq!(CollectionKind::ClassSessions.storage_key(), "classCards");
        assert_eq!(CollectionKind::TestResults.storage_key(), "testResults");
    }

    #[test]
    fn test_unknown_test_type_is_kept_verbatim() {
        let json = r#"{"id":"t1","studentId":"s1","type":"oral","subject":"English","score":70,"date":"2024-03-01","memo":"","createdAt":"2024-03-01T00:00:00Z"}"#;
        let test: TestResult = serde_json::from_str(json).unwrap();
        assert_eq!(test.test_type, TestType::Other("oral".to_string()));
        assert_eq!(test.memo, None);

        let back = serde_json::to_string(&test).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_known_test_types() {
        assert_eq!(TestType::from("test"), TestType::Test);
        assert_eq!(TestType::from("homework"), TestType::Homework);
        assert_eq!(TestType::from("online"), TestType::Online);
        assert_eq!(String::from(TestType::Online), "online");
    }

    #[test]
    fn test_legacy_student_without_parent_phone() {
        let json = r#"{"id":"1700000000000","name":"Anna","grade":"중2","phone":"010-1234-5678","parentPhone":"","registeredDate":"2024-01-05"}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.parent_phone, None);
        assert_eq!(serde_json::to_string(&student).unwrap(), json);
    }

    #[test]
    fn test_has_homework_ignores_whitespace() {
        assert!(sample_session(Some("p. 12-14")).has_homework());
        assert!(!sample_session(Some("   ")).has_homework());
        assert!(!sample_session(None).has_homework());
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::classify(100), ScoreBand::High);
        assert_eq!(ScoreBand::classify(80), ScoreBand::High);
        assert_eq!(ScoreBand::classify(79), ScoreBand::Medium);
        assert_eq!(ScoreBand::classify(60), ScoreBand::Medium);
        assert_eq!(ScoreBand::classify(59), ScoreBand::Low);
        assert_eq!(ScoreBand::classify(-5), ScoreBand::Low);
        assert_eq!(ScoreBand::classify(250), ScoreBand::High);

        let test: TestResult = serde_json::from_str(
            r#"{"id":"t1","studentId":"s1","type":"test","subject":"Math","score":65,"date":"2024-03-01","createdAt":""}"#,
        )
        .unwrap();
        assert_eq!(test.score_band(), ScoreBand::Medium);
        assert_eq!(serde_json::to_string(&test.score_band()).unwrap(), r#""medium""#);
    }
}
