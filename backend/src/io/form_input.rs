//! Raw form fields to create requests.
//!
//! Forms hand over every field as a string. Conversion trims text, turns
//! blank optional fields into `None` and reads the score, so the repositories
//! only ever see typed requests.

use serde::{Deserialize, Serialize};
use shared::{CreateClassSessionRequest, CreateStudentRequest, CreateTestResultRequest, TestType};

use crate::domain::errors::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentForm {
    pub name: String,
    pub grade: String,
    pub phone: String,
    pub parent_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassSessionForm {
    pub student_id: String,
    pub date: String,
    pub subject: String,
    pub content: String,
    pub homework: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResultForm {
    pub student_id: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub subject: String,
    pub score: String,
    pub date: String,
    pub memo: String,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read a score the way a number input is read: the leading whole number,
/// with anything after it (a decimal part, a unit) ignored.
pub fn parse_score(input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    let digits_start = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidScore(input.to_string()));
    }
    trimmed[..digits_start + digits_len]
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidScore(input.to_string()))
}

impl From<StudentForm> for CreateStudentRequest {
    fn from(form: StudentForm) -> Self {
        CreateStudentRequest {
            name: form.name.trim().to_string(),
            grade: form.grade.trim().to_string(),
            phone: form.phone.trim().to_string(),
            parent_phone: optional(&form.parent_phone),
        }
    }
}

impl From<ClassSessionForm> for CreateClassSessionRequest {
    fn from(form: ClassSessionForm) -> Self {
        CreateClassSessionRequest {
            student_id: form.student_id.trim().to_string(),
            date: form.date.trim().to_string(),
            subject: form.subject.trim().to_string(),
            content: form.content.trim().to_string(),
            homework: optional(&form.homework),
            notes: optional(&form.notes),
        }
    }
}

impl TryFrom<TestResultForm> for CreateTestResultRequest {
    type Error = ValidationError;

    fn try_from(form: TestResultForm) -> Result<Self, Self::Error> {
        let score = parse_score(&form.score)?;
        Ok(CreateTestResultRequest {
            student_id: form.student_id.trim().to_string(),
            test_type: TestType::from(form.test_type.trim()),
            subject: form.subject.trim().to_string(),
            score,
            date: form.date.trim().to_string(),
            memo: optional(&form.memo),
        })
    }
}
