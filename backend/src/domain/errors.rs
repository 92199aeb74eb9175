//! Error types shared by the storage and domain layers.

use std::path::PathBuf;

/// Input rejected at a repository boundary, before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Student name cannot be empty")]
    EmptyName,
    #[error("Grade cannot be empty")]
    EmptyGrade,
    #[error("Subject cannot be empty")]
    EmptySubject,
    #[error("A student must be selected")]
    EmptyStudentId,
    #[error("Invalid {field}: '{value}' is not a YYYY-MM-DD date or date-time")]
    InvalidDate { field: &'static str, value: String },
    #[error("Score must be a whole number, got '{0}'")]
    InvalidScore(String),
    #[error("Month must be in YYYY-MM format, got '{0}'")]
    InvalidYearMonth(String),
}

/// A write to the persistent store failed. In-memory state is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store is read-only, write to '{key}' rejected")]
    ReadOnly { key: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AcademyError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Mutations report write failures through `WriteOutcome`; callers that
    /// want a failed write to be an error get this from `into_result()?`.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AcademyError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        AcademyError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AcademyError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AcademyError::not_found("student", "student::42");
        assert_eq!(err.to_string(), "student not found: student::42");
        assert!(err.is_not_found());

        let err: AcademyError = ValidationError::InvalidScore("abc".to_string()).into();
        assert_eq!(err.to_string(), "Score must be a whole number, got 'abc'");
        assert!(!err.is_not_found());
    }
}
