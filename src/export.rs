//! Export of an exam as a Hydro objective problem.
//!
//! An export runs in three stages:
//!
//! 1. **Validating**: every problem is checked; the first invalid problem
//!    aborts the export.
//! 2. **Generating**: the problem descriptor, statement and grading config are
//!    rendered in memory.
//! 3. **Writing**: a fresh `<timestamp>_<exam>` directory is created under the
//!    export root and the artifacts are written into it:
//!
//! ```text
//! export/20240101_093000_Midterm/
//! ├── problem.yaml
//! ├── problem_zh.md
//! └── testdata/
//!     └── config.yaml
//! ```
//!
//! Nothing is written unless validation and generation succeed. If writing
//! fails part-way, files that were already written are left in place.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::{Exam, ExamName};

mod artifacts;
pub use artifacts::{Artifacts, GradingConfig, ProblemDescriptor, render_statement};

mod validate;
pub use validate::{Defect, InvalidProblem, ValidationMode, check_problem, validate};

/// File name of the problem descriptor.
pub const DESCRIPTOR_FILE: &str = "problem.yaml";
/// File name of the statement document.
pub const STATEMENT_FILE: &str = "problem_zh.md";
/// Directory holding the grading config.
pub const TESTDATA_DIR: &str = "testdata";
/// File name of the grading config, inside [`TESTDATA_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Settings for an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// The directory export directories are created in.
    pub export_root: PathBuf,
    /// The Hydro user ID written as `owner`.
    pub owner: i64,
    /// How problems are validated.
    pub mode: ValidationMode,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            export_root: PathBuf::from("export"),
            owner: 1,
            mode: ValidationMode::default(),
        }
    }
}

/// Errors that abort an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A problem failed validation.
    #[error(transparent)]
    InvalidProblem(#[from] InvalidProblem),
    /// No Hydro problem ID was given.
    #[error("a Hydro problem ID (pid) is required")]
    MissingPid,
    /// An artifact could not be rendered.
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A directory or file could not be created.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// The directory or file that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Export `exam` using the current local time for the directory name.
///
/// Returns the export directory.
///
/// # Errors
///
/// See [`export_at`].
pub fn export(exam: &Exam, pid: &str, options: &ExportOptions) -> Result<PathBuf, ExportError> {
    export_at(exam, pid, options, Local::now().naive_local())
}

/// Export `exam`, naming the export directory after `now`.
///
/// Returns the export directory.
///
/// # Errors
///
/// This function fails if:
///
/// - a problem is invalid ([`ExportError::InvalidProblem`])
/// - `pid` is empty ([`ExportError::MissingPid`])
/// - the export directory or one of the files cannot be written
///   ([`ExportError::Io`])
#[tracing::instrument(level = "debug", skip(exam, options), fields(exam = %exam.name()))]
pub fn export_at(
    exam: &Exam,
    pid: &str,
    options: &ExportOptions,
    now: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    validate(exam, options.mode)?;

    if pid.is_empty() {
        return Err(ExportError::MissingPid);
    }
    let artifacts = Artifacts::generate(exam, pid, options.owner)?;

    let dir = create_export_dir(&options.export_root, exam.name(), now)?;
    write_file(&dir.join(DESCRIPTOR_FILE), &artifacts.descriptor)?;
    write_file(&dir.join(STATEMENT_FILE), &artifacts.statement)?;
    write_file(
        &dir.join(TESTDATA_DIR).join(CONFIG_FILE),
        &artifacts.config,
    )?;

    tracing::info!("Exported '{}' to {}", exam.name(), dir.display());
    Ok(dir)
}

/// Create `<root>/<timestamp>_<name>/testdata`, returning the export
/// directory.
///
/// Exports of the same exam within the same second get a `-2`, `-3`, …
/// suffix.
fn create_export_dir(
    root: &Path,
    name: &ExamName,
    now: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let base = format!("{}_{name}", now.format(TIMESTAMP_FORMAT));

    let mut dir = root.join(&base);
    let mut attempt = 1;
    while dir.exists() {
        attempt += 1;
        dir = root.join(format!("{base}-{attempt}"));
    }

    let testdata = dir.join(TESTDATA_DIR);
    fs::create_dir_all(&testdata).map_err(|source| ExportError::Io {
        path: testdata,
        source,
    })?;

    Ok(dir)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::Problem;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 5)
            .unwrap()
    }

    fn options(tmp: &TempDir) -> ExportOptions {
        ExportOptions {
            export_root: tmp.path().join("export"),
            ..ExportOptions::default()
        }
    }

    fn exam(problems: Vec<Problem>) -> Exam {
        Exam::new(ExamName::try_from("Quiz").unwrap(), problems)
    }

    fn valid_problem() -> Problem {
        Problem::new(
            "1+1=?".to_string(),
            vec!["1".to_string(), "2".to_string()],
            "B".to_string(),
            2.0,
        )
    }

    #[test]
    fn writes_all_three_artifacts() {
        let tmp = TempDir::new().unwrap();

        let dir = export_at(&exam(vec![valid_problem()]), "P1", &options(&tmp), noon()).unwrap();

        assert_eq!(dir, tmp.path().join("export").join("20240601_120005_Quiz"));
        assert!(dir.join(DESCRIPTOR_FILE).is_file());
        assert!(dir.join(STATEMENT_FILE).is_file());
        assert!(dir.join(TESTDATA_DIR).join(CONFIG_FILE).is_file());
    }

    #[test]
    fn same_second_exports_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let exam = exam(vec![valid_problem()]);

        let first = export_at(&exam, "P1", &options(&tmp), noon()).unwrap();
        let second = export_at(&exam, "P1", &options(&tmp), noon()).unwrap();
        let third = export_at(&exam, "P1", &options(&tmp), noon()).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("20240601_120005_Quiz-2"));
        assert!(third.ends_with("20240601_120005_Quiz-3"));
    }

    #[test]
    fn invalid_problem_aborts_before_writing() {
        let tmp = TempDir::new().unwrap();
        let mut broken = valid_problem();
        broken.edit(String::new(), vec!["x".to_string()], "A".to_string(), 1.0);

        let error = export_at(
            &exam(vec![valid_problem(), broken]),
            "P1",
            &options(&tmp),
            noon(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            ExportError::InvalidProblem(InvalidProblem { index: 1, .. })
        ));
        assert!(!tmp.path().join("export").exists());
    }

    #[test]
    fn empty_pid_aborts_before_writing() {
        let tmp = TempDir::new().unwrap();

        let error = export_at(&exam(vec![valid_problem()]), "", &options(&tmp), noon()).unwrap_err();

        assert!(matches!(error, ExportError::MissingPid));
        assert!(!tmp.path().join("export").exists());
    }

    #[test]
    fn unwritable_root_is_reported() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("export");
        fs::write(&blocker, "not a directory").unwrap();

        let error = export_at(&exam(vec![valid_problem()]), "P1", &options(&tmp), noon()).unwrap_err();

        assert!(matches!(error, ExportError::Io { .. }));
    }
}
