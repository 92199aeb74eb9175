//! Dashboard metrics and monthly reports.

use chrono::NaiveDate;
use log::info;
use shared::{ClassSession, DashboardMetrics, MonthlyReport, Student, TestResult};

use super::dates::{calendar_date, YearMonth};
use super::errors::AcademyError;
use super::query::{find_student, sessions_for_student, sessions_in_range, tests_for_student, tests_in_range};

/// Mean score rounded to the nearest integer, halves rounding up.
/// `None` for an empty set.
pub fn average_score<'a>(tests: impl IntoIterator<Item = &'a TestResult>) -> Option<i64> {
    let (sum, count) = tests
        .into_iter()
        .fold((0i128, 0i128), |(sum, count), t| (sum + t.score as i128, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum as f64 / count as f64;
    Some((mean + 0.5).floor() as i64)
}

pub fn dashboard_metrics(
    students: &[Student],
    sessions: &[ClassSession],
    tests: &[TestResult],
    today: NaiveDate,
) -> DashboardMetrics {
    DashboardMetrics {
        student_count: students.len(),
        today_session_count: sessions
            .iter()
            .filter(|s| calendar_date(&s.date) == Some(today))
            .count(),
        pending_homework_count: sessions.iter().filter(|s| s.has_homework()).count(),
        average_score: average_score(tests),
    }
}

/// One student's sessions and tests within `month`.
///
/// Fails with `NotFound` only when the student itself is missing; a month
/// without activity is a valid, empty report.
pub fn monthly_report(
    students: &[Student],
    sessions: &[ClassSession],
    tests: &[TestResult],
    student_id: &str,
    month: YearMonth,
) -> Result<MonthlyReport, AcademyError> {
    let student = find_student(students, student_id).ok_or_else(|| AcademyError::not_found("student", student_id))?;

    let (start, end) = (month.first_day(), month.last_day());

    let student_sessions: Vec<ClassSession> = sessions_for_student(sessions, student_id)
        .into_iter()
        .cloned()
        .collect();
    let month_sessions: Vec<ClassSession> = sessions_in_range(&student_sessions, start, end)
        .into_iter()
        .cloned()
        .collect();

    let student_tests: Vec<TestResult> = tests_for_student(tests, student_id).into_iter().cloned().collect();
    let month_tests: Vec<TestResult> = tests_in_range(&student_tests, start, end).into_iter().cloned().collect();

    let average = average_score(&month_tests);
    info!(
        "Monthly report {} for {}: {} sessions, {} tests, average {:?}",
        month,
        student.name,
        month_sessions.len(),
        month_tests.len(),
        average
    );

    Ok(MonthlyReport {
        student: student.clone(),
        month: month.to_string(),
        sessions: month_sessions,
        tests: month_tests,
        average_score: average,
    })
}
