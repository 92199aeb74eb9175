//! Recent-activity feed: the newest few entries of every collection merged
//! into one chronological list.

use chrono::{DateTime, Utc};
use shared::{ActivityItem, ActivityKind, ClassSession, Student, TestResult};

use super::dates::parse_timestamp;
use super::query::{recent_n, student_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityFeedOptions {
    /// Entries taken from the tail of each collection
    pub per_collection: usize,
    /// Length of the merged feed
    pub limit: usize,
}

impl Default for ActivityFeedOptions {
    fn default() -> Self {
        Self {
            per_collection: 3,
            limit: 5,
        }
    }
}

fn student_item(student: &Student) -> ActivityItem {
    ActivityItem {
        kind: ActivityKind::Student,
        record_id: student.id.clone(),
        label: format!("{} ({})", student.name, student.grade),
        timestamp: parse_timestamp(&student.registered_date),
    }
}

fn session_item(students: &[Student], session: &ClassSession) -> ActivityItem {
    ActivityItem {
        kind: ActivityKind::ClassSession,
        record_id: session.id.clone(),
        label: format!("{} - {}", student_name(students, &session.student_id), session.subject),
        timestamp: parse_timestamp(&session.created_at),
    }
}

fn test_item(students: &[Student], test: &TestResult) -> ActivityItem {
    ActivityItem {
        kind: ActivityKind::TestResult,
        record_id: test.id.clone(),
        label: format!(
            "{} - {} ({})",
            student_name(students, &test.student_id),
            test.subject,
            test.score
        ),
        timestamp: parse_timestamp(&test.created_at),
    }
}

/// Newest first; `None` sorts after every real timestamp.
fn newest_first(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

/// Build the feed.
///
/// Candidates are gathered students first, then sessions, then tests, and
/// the sort is stable, so equal timestamps keep that order.
pub fn build_activity_feed(
    students: &[Student],
    sessions: &[ClassSession],
    tests: &[TestResult],
    options: ActivityFeedOptions,
) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = recent_n(students, options.per_collection)
        .into_iter()
        .map(student_item)
        .collect();
    items.extend(
        recent_n(sessions, options.per_collection)
            .into_iter()
            .map(|session| session_item(students, session)),
    );
    items.extend(
        recent_n(tests, options.per_collection)
            .into_iter()
            .map(|test| test_item(students, test)),
    );

    items.sort_by(|a, b| newest_first(&a.timestamp, &b.timestamp));
    items.truncate(options.limit);
    items
}
