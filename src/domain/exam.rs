use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    domain::{ExamName, Problem},
    storage::{
        EXAM_FILE_EXTENSION, LoadError, RecordError, SaveError, exam_file,
        record::ExamRecord,
    },
};

/// An exam is a named, ordered list of problems.
///
/// The name is also the persistence key: an exam named `Midterm` lives in
/// `Midterm.json` inside the exams directory.
///
/// All mutating methods only change the in-memory value. Persisting is done
/// explicitly with [`Exam::save`], or by going through
/// [`ExamStore`](crate::ExamStore), which saves after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Exam {
    name: ExamName,
    problems: Vec<Problem>,
}

impl Exam {
    /// Construct an exam without touching the filesystem.
    #[must_use]
    pub const fn new(name: ExamName, problems: Vec<Problem>) -> Self {
        Self { name, problems }
    }

    /// Construct an exam and immediately write it to `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the exam file cannot be written.
    pub fn create(dir: &Path, name: ExamName, problems: Vec<Problem>) -> Result<Self, SaveError> {
        let exam = Self::new(name, problems);
        exam.save(dir)?;
        Ok(exam)
    }

    /// Build an exam from a JSON record.
    ///
    /// Problems are read tolerantly (see [`Problem::from_record`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not an object or its name is not a
    /// valid [`ExamName`].
    pub fn from_record(record: &Value) -> Result<Self, RecordError> {
        if !record.is_object() {
            return Err(RecordError::NotAnObject);
        }

        ExamRecord::deserialize(record)
            .map_err(|_| RecordError::NotAnObject)?
            .try_into()
    }

    /// Serialize the exam to a JSON record.
    #[must_use]
    pub fn to_record(&self) -> Value {
        serde_json::json!({
            "name": self.name.as_str(),
            "problems": self.problems.iter().map(Problem::to_record).collect::<Vec<_>>(),
        })
    }

    /// The exam's name.
    #[must_use]
    pub const fn name(&self) -> &ExamName {
        &self.name
    }

    /// The exam's problems, in order.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// The problem at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ExamError::NoSuchProblem`] if `index` is out of range.
    pub fn problem(&self, index: usize) -> Result<&Problem, ExamError> {
        self.problems.get(index).ok_or(ExamError::NoSuchProblem {
            index,
            len: self.problems.len(),
        })
    }

    /// Append a problem to the end of the exam.
    pub fn add_problem(&mut self, problem: Problem) -> &mut Self {
        self.problems.push(problem);
        self
    }

    /// Remove and return the problem at `index`.
    ///
    /// Later problems shift down by one position.
    ///
    /// # Errors
    ///
    /// Returns [`ExamError::NoSuchProblem`] if `index` is out of range, in
    /// which case the exam is left unchanged.
    pub fn remove_problem(&mut self, index: usize) -> Result<Problem, ExamError> {
        self.problem(index)?;
        Ok(self.problems.remove(index))
    }

    /// Replace every field of the problem at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ExamError::NoSuchProblem`] if `index` is out of range.
    pub fn edit_problem(
        &mut self,
        index: usize,
        statement: String,
        choices: Vec<String>,
        correct_choice: String,
        score: f64,
    ) -> Result<&Problem, ExamError> {
        let len = self.problems.len();
        let problem = self
            .problems
            .get_mut(index)
            .ok_or(ExamError::NoSuchProblem { index, len })?;
        problem.edit(statement, choices, correct_choice, score);
        Ok(&*problem)
    }

    /// The path of this exam's file inside `dir`.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{EXAM_FILE_EXTENSION}", self.name))
    }

    /// Write the exam to `<dir>/<name>.json`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<(), SaveError> {
        let path = self.path_in(dir);
        exam_file::save_to_path(self, &path)?;
        tracing::debug!("Saved exam '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Read an exam from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold an exam.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        exam_file::load(path)
    }
}

/// Errors from operations that address a problem by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExamError {
    /// The problem index is out of range.
    #[error("no problem at index {index} (exam has {len} problems)")]
    NoSuchProblem {
        /// The requested index.
        index: usize,
        /// The number of problems in the exam.
        len: usize,
    },
}
