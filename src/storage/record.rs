//! Serialized forms of exams and problems.
//!
//! Exam files are read tolerantly: a field with the wrong type is treated as
//! absent rather than rejecting the whole file. Only the exam name is checked,
//! because it is the persistence key.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{Exam, ExamName, InvalidNameError, Problem};

/// A problem as it appears in an exam file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ProblemRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) statement: String,
    #[serde(deserialize_with = "lenient_strings")]
    pub(crate) choices: Vec<String>,
    #[serde(rename = "correctChoice", deserialize_with = "lenient_string")]
    pub(crate) correct_choice: String,
    #[serde(deserialize_with = "lenient_number")]
    pub(crate) score: f64,
}

/// An exam as it appears in an exam file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ExamRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub(crate) name: String,
    #[serde(deserialize_with = "lenient_problems")]
    pub(crate) problems: Vec<ProblemRecord>,
}

impl From<&Exam> for ExamRecord {
    fn from(exam: &Exam) -> Self {
        Self {
            name: exam.name().to_string(),
            problems: exam.problems().iter().map(ProblemRecord::from).collect(),
        }
    }
}

impl TryFrom<ExamRecord> for Exam {
    type Error = RecordError;

    fn try_from(record: ExamRecord) -> Result<Self, Self::Error> {
        let name = ExamName::new(record.name)?;
        let problems = record.problems.into_iter().map(Problem::from).collect();
        Ok(Self::new(name, problems))
    }
}

/// Errors that can occur when interpreting an exam record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record is not a JSON object.
    #[error("exam record must be a JSON object")]
    NotAnObject,
    /// The record's name is missing or not a valid exam name.
    #[error("invalid exam name in record: {0}")]
    Name(#[from] InvalidNameError),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                _ => String::new(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or_default())
}

fn lenient_problems<'de, D>(deserializer: D) -> Result<Vec<ProblemRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| ProblemRecord::deserialize(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
