//! Domain models for exam authoring.
//!
//! This module contains the core domain types: problems, exams, validated exam
//! names, and the workspace configuration.

/// Single multiple-choice problems.
pub mod problem;
pub use problem::Problem;

/// Exams and their problem lists.
pub mod exam;
pub use exam::{Exam, ExamError};

mod exam_name;
pub use exam_name::{ExamName, InvalidNameError};

mod config;
pub use config::{CONFIG_FILE_NAME, Config, ConfigError};
