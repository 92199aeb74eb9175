//! Read-only views over repository snapshots.
//!
//! Everything here is a pure function of the slices it is given, so callers
//! can recompute any view after a mutation without cache invalidation.

use chrono::NaiveDate;
use shared::{ClassSession, Student, StudentSummary, TestResult, UNKNOWN_STUDENT_LABEL};

use super::dates::calendar_date;

/// Case-insensitive name search combined with an exact grade match.
/// An empty name query or a blank/absent grade matches everyone.
pub fn filter_students<'a>(students: &'a [Student], name_query: &str, grade: Option<&str>) -> Vec<&'a Student> {
    let needle = name_query.to_lowercase();
    let grade = grade.map(str::trim).filter(|g| !g.is_empty());

    students
        .iter()
        .filter(|student| student.name.to_lowercase().contains(&needle))
        .filter(|student| grade.map_or(true, |g| student.grade == g))
        .collect()
}

pub fn find_student<'a>(students: &'a [Student], student_id: &str) -> Option<&'a Student> {
    students.iter().find(|student| student.id == student_id)
}

/// Name for a weak student reference, or the `unknown` placeholder
pub fn student_name<'a>(students: &'a [Student], student_id: &str) -> &'a str {
    find_student(students, student_id)
        .map(|student| student.name.as_str())
        .unwrap_or(UNKNOWN_STUDENT_LABEL)
}

/// Sessions logged for `student_id`, whether or not that student still exists
pub fn sessions_for_student<'a>(sessions: &'a [ClassSession], student_id: &str) -> Vec<&'a ClassSession> {
    sessions.iter().filter(|s| s.student_id == student_id).collect()
}

pub fn tests_for_student<'a>(tests: &'a [TestResult], student_id: &str) -> Vec<&'a TestResult> {
    tests.iter().filter(|t| t.student_id == student_id).collect()
}

fn within(value: &str, start: NaiveDate, end: NaiveDate) -> bool {
    calendar_date(value).map_or(false, |date| date >= start && date <= end)
}

/// Sessions whose calendar date lies in `[start, end]`
pub fn sessions_in_range(sessions: &[ClassSession], start: NaiveDate, end: NaiveDate) -> Vec<&ClassSession> {
    sessions.iter().filter(|s| within(&s.date, start, end)).collect()
}

/// Test results whose date lies in `[start, end]`
pub fn tests_in_range(tests: &[TestResult], start: NaiveDate, end: NaiveDate) -> Vec<&TestResult> {
    tests.iter().filter(|t| within(&t.date, start, end)).collect()
}

/// The last `n` items by insertion order, newest first
pub fn recent_n<T>(items: &[T], n: usize) -> Vec<&T> {
    items.iter().rev().take(n).collect()
}

pub fn student_summary(
    students: &[Student],
    sessions: &[ClassSession],
    tests: &[TestResult],
    student_id: &str,
) -> Option<StudentSummary> {
    let student = find_student(students, student_id)?;
    Some(StudentSummary {
        student: student.clone(),
        session_count: sessions_for_student(sessions, student_id).len(),
        test_count: tests_for_student(tests, student_id).len(),
    })
}
