//! Multiple-choice exam authoring for the Hydro online judge.
//!
//! Exams are JSON documents stored one per file in a directory. An exam can be
//! exported as a Hydro "objective" problem: a problem descriptor, a markdown
//! statement with answer widgets, and a grading config.

pub mod domain;
pub use domain::{
    CONFIG_FILE_NAME, Config, ConfigError, Exam, ExamError, ExamName, InvalidNameError, Problem,
};

/// Filesystem storage of exams.
pub mod storage;
pub use storage::{ExamStore, LoadError, RecordError, SaveError, SkippedFile, StoreError};

/// Export of exams to the Hydro problem layout.
pub mod export;
pub use export::{ExportError, ExportOptions, InvalidProblem, ValidationMode};
