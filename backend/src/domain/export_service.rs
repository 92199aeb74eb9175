//! Export service for academy data.
//!
//! Builds a read-only [`AcademySnapshot`] of every collection and renders
//! each collection as a CSV table with student ids resolved to names, ready
//! for whichever spreadsheet adapter the caller wires up.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::Writer;
use log::info;
use shared::{AcademySnapshot, ClassSession, Student, TestResult};

use super::query::student_name;

#[derive(Clone, Default)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    pub fn snapshot(
        &self,
        students: &[Student],
        sessions: &[ClassSession],
        tests: &[TestResult],
        exported_at: DateTime<Utc>,
    ) -> AcademySnapshot {
        info!(
            "📄 EXPORT: Snapshot with {} students, {} class cards, {} test results",
            students.len(),
            sessions.len(),
            tests.len()
        );
        AcademySnapshot {
            exported_at: exported_at.to_rfc3339(),
            total_students: students.len(),
            total_classes: sessions.len(),
            total_tests: tests.len(),
            students: students.to_vec(),
            class_cards: sessions.to_vec(),
            test_results: tests.to_vec(),
        }
    }

    pub fn students_csv(&self, students: &[Student]) -> Result<String> {
        let mut writer = Writer::from_writer(vec![]);
        writer.write_record(["name", "grade", "phone", "parentPhone", "registeredDate"])?;
        for student in students {
            writer.write_record([
                student.name.as_str(),
                student.grade.as_str(),
                student.phone.as_str(),
                student.parent_phone.as_deref().unwrap_or(""),
                student.registered_date.as_str(),
            ])?;
        }
        finish(writer, "students")
    }

    /// Class cards, one row each, with the student's name in place of the id
    pub fn sessions_csv(&self, students: &[Student], sessions: &[ClassSession]) -> Result<String> {
        let mut writer = Writer::from_writer(vec![]);
        writer.write_record(["date", "student", "subject", "content", "homework", "notes"])?;
        for session in sessions {
            writer.write_record([
                session.date.as_str(),
                student_name(students, &session.student_id),
                session.subject.as_str(),
                session.content.as_str(),
                session.homework.as_deref().unwrap_or(""),
                session.notes.as_deref().unwrap_or(""),
            ])?;
        }
        finish(writer, "class cards")
    }

    /// Test results; `type` carries the raw value, never a display label
    pub fn tests_csv(&self, students: &[Student], tests: &[TestResult]) -> Result<String> {
        let mut writer = Writer::from_writer(vec![]);
        writer.write_record(["date", "student", "type", "subject", "score", "memo"])?;
        for test in tests {
            let score = test.score.to_string();
            writer.write_record([
                test.date.as_str(),
                student_name(students, &test.student_id),
                test.test_type.as_str(),
                test.subject.as_str(),
                score.as_str(),
                test.memo.as_deref().unwrap_or(""),
            ])?;
        }
        finish(writer, "test results")
    }
}

fn finish(writer: Writer<Vec<u8>>, table: &str) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush {} CSV: {}", table, e))?;
    String::from_utf8(bytes).with_context(|| format!("{} CSV is not valid UTF-8", table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::TestType;

    fn students() -> Vec<Student> {
        vec![Student {
            id: "s1".to_string(),
            name: "Anna".to_string(),
            grade: "중2".to_string(),
            phone: "010-1111-2222".to_string(),
            parent_phone: None,
            registered_date: "2024-01-05".to_string(),
        }]
    }

    fn sessions() -> Vec<ClassSession> {
        vec![
            ClassSession {
                id: "c1".to_string(),
                student_id: "s1".to_string(),
                date: "2024-03-05T14:30".to_string(),
                subject: "Math".to_string(),
                content: "Fractions, decimals".to_string(),
                homework: Some("p. 12".to_string()),
                notes: None,
                created_at: "2024-03-05T05:31:00+00:00".to_string(),
            },
            ClassSession {
                id: "c2".to_string(),
                student_id: "gone".to_string(),
                date: "2024-03-06T10:00".to_string(),
                subject: "Science".to_string(),
                content: String::new(),
                homework: None,
                notes: Some("make-up class".to_string()),
                created_at: "2024-03-06T01:00:00+00:00".to_string(),
            },
        ]
    }

    fn tests() -> Vec<TestResult> {
        vec![TestResult {
            id: "t1".to_string(),
            student_id: "s1".to_string(),
            test_type: TestType::Online,
            subject: "Math".to_string(),
            score: 85,
            date: "2024-03-07".to_string(),
            memo: None,
            created_at: "2024-03-07T00:00:00+00:00".to_string(),
        }]
    }

    #[test]
    fn test_snapshot_totals_and_json_layout() {
        let service = ExportService::new();
        let exported_at = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
        let snapshot = service.snapshot(&students(), &sessions(), &tests(), exported_at);

        assert_eq!(snapshot.total_students, 1);
        assert_eq!(snapshot.total_classes, 2);
        assert_eq!(snapshot.total_tests, 1);
        assert_eq!(snapshot.exported_at, "2024-03-08T12:00:00+00:00");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalClasses"], 2);
        assert_eq!(json["classCards"][0]["studentId"], "s1");
        assert_eq!(json["testResults"][0]["type"], "online");
    }

    #[test]
    fn test_students_csv() {
        let csv = ExportService::new().students_csv(&students()).unwrap();
        assert_eq!(
            csv,
            "name,grade,phone,parentPhone,registeredDate\nAnna,중2,010-1111-2222,,2024-01-05\n"
        );
    }

    #[test]
    fn test_sessions_csv_resolves_names_and_quotes() {
        let csv = ExportService::new().sessions_csv(&students(), &sessions()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,student,subject,content,homework,notes");
        assert_eq!(lines[1], "2024-03-05T14:30,Anna,Math,\"Fractions, decimals\",p. 12,");
        assert_eq!(lines[2], "2024-03-06T10:00,unknown,Science,,,make-up class");
    }

    #[test]
    fn test_tests_csv_uses_raw_type() {
        let csv = ExportService::new().tests_csv(&students(), &tests()).unwrap();
        assert_eq!(
            csv,
            "date,student,type,subject,score,memo\n2024-03-07,Anna,online,Math,85,\n"
        );
    }

    #[test]
    fn test_empty_tables_have_headers_only() {
        let service = ExportService::new();
        assert_eq!(service.tests_csv(&[], &[]).unwrap(), "date,student,type,subject,score,memo\n");
    }
}
