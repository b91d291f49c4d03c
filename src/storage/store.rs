//! A filesystem backed store of exams
//!
//! The [`ExamStore`] loads every exam file in a directory once, then keeps the
//! in-memory exams and their files in step: every mutating method saves the
//! affected exam before it returns.

use std::{
    ffi::OsStr,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    Exam, ExamError, ExamName, Problem,
    export::{self, ExportError, ExportOptions},
    storage::{EXAM_FILE_EXTENSION, LoadError, SaveError},
};

/// The loaded exams of one exams directory.
#[derive(Debug)]
pub struct ExamStore {
    /// The directory exam files are stored in.
    root: PathBuf,
    exams: Vec<Exam>,
    skipped: Vec<SkippedFile>,
}

impl ExamStore {
    /// Load every exam file in `root`.
    ///
    /// The directory is created if it does not exist. Files are read in file
    /// name order. A file that cannot be read, is not a valid exam, or holds an
    /// exam whose name differs from the file name is skipped; see
    /// [`ExamStore::skipped`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be created or
    /// listed.
    pub fn load_all(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;

        let mut store = Self {
            root,
            exams: Vec::new(),
            skipped: Vec::new(),
        };

        for path in collect_exam_paths(&store.root)? {
            match Exam::load(&path) {
                Ok(exam) if path.file_stem() != Some(OsStr::new(exam.name().as_str())) => {
                    store.skip(path, SkipReason::NameMismatch(exam.name().clone()));
                }
                Ok(exam) => store.exams.push(exam),
                Err(error) => store.skip(path, SkipReason::Load(error)),
            }
        }

        tracing::debug!(
            "Loaded {} exams from {} ({} skipped)",
            store.exams.len(),
            store.root.display(),
            store.skipped.len()
        );

        Ok(store)
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        tracing::warn!("Skipping {}: {reason}", path.display());
        self.skipped.push(SkippedFile { path, reason });
    }

    /// The directory exam files are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All loaded exams, in load order.
    #[must_use]
    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    /// Files that were found but not loaded.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// The number of loaded exams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exams.len()
    }

    /// Whether the store holds no exams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// The exam at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchExam`] if `index` is out of range.
    pub fn exam(&self, index: usize) -> Result<&Exam, StoreError> {
        self.exams.get(index).ok_or(StoreError::NoSuchExam {
            index,
            len: self.exams.len(),
        })
    }

    /// The index of the exam called `name`, if any.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.exams.iter().position(|exam| exam.name().as_str() == name)
    }

    /// The index of the exam called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownExam`] if there is no such exam.
    pub fn find(&self, name: &str) -> Result<usize, StoreError> {
        self.position(name)
            .ok_or_else(|| StoreError::UnknownExam(name.to_string()))
    }

    /// Create a new, empty exam and write its file.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - an exam with the same name is already loaded
    /// - a file named after the exam already exists, even one that was
    ///   skipped at load
    /// - the exam file cannot be written
    pub fn create_exam(&mut self, name: ExamName) -> Result<&Exam, StoreError> {
        if self.position(&name).is_some() {
            return Err(StoreError::DuplicateName(name));
        }

        let path = self.root.join(format!("{name}.{EXAM_FILE_EXTENSION}"));
        if path.exists() {
            return Err(StoreError::FileExists(path));
        }

        let exam = Exam::create(&self.root, name, Vec::new())?;
        tracing::info!("Created exam '{}'", exam.name());

        let index = self.exams.len();
        self.exams.push(exam);
        Ok(&self.exams[index])
    }

    /// Append `problem` to the exam at `exam` and save it.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - there is no exam at `exam`
    /// - the exam file cannot be written, in which case the problem is not
    ///   added
    pub fn add_problem(&mut self, exam: usize, problem: Problem) -> Result<&Exam, StoreError> {
        self.mutate(exam, |target| {
            target.add_problem(problem);
            Ok(())
        })?;
        tracing::info!("Added problem to exam '{}'", self.exams[exam].name());
        Ok(&self.exams[exam])
    }

    /// Remove the problem at `index` from the exam at `exam` and save it.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - there is no exam at `exam`
    /// - there is no problem at `index`
    /// - the exam file cannot be written, in which case the problem is
    ///   restored
    pub fn remove_problem(&mut self, exam: usize, index: usize) -> Result<Problem, StoreError> {
        let removed = self.mutate(exam, |target| target.remove_problem(index))?;
        tracing::info!(
            "Removed problem {} from exam '{}'",
            index + 1,
            self.exams[exam].name()
        );
        Ok(removed)
    }

    /// Replace every field of a problem and save the exam.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - there is no exam at `exam`
    /// - there is no problem at `index`
    /// - the exam file cannot be written, in which case the edit is undone
    pub fn edit_problem(
        &mut self,
        exam: usize,
        index: usize,
        statement: String,
        choices: Vec<String>,
        correct_choice: String,
        score: f64,
    ) -> Result<&Problem, StoreError> {
        self.mutate(exam, |target| {
            target
                .edit_problem(index, statement, choices, correct_choice, score)
                .map(|_| ())
        })?;
        tracing::info!(
            "Edited problem {} of exam '{}'",
            index + 1,
            self.exams[exam].name()
        );
        Ok(self.exams[exam].problem(index)?)
    }

    /// Export the exam at `exam` to the Hydro problem layout.
    ///
    /// Returns the directory the export was written to.
    ///
    /// # Errors
    ///
    /// This method can fail if there is no exam at `exam`, or if the export
    /// itself fails (see [`export::export`]).
    pub fn export(
        &self,
        exam: usize,
        pid: &str,
        options: &ExportOptions,
    ) -> Result<PathBuf, StoreError> {
        Ok(export::export(self.exam(exam)?, pid, options)?)
    }

    /// Apply `change` to an exam, then save it.
    ///
    /// If saving fails the exam is restored to its previous state, so the
    /// in-memory exams never run ahead of their files.
    fn mutate<T>(
        &mut self,
        index: usize,
        change: impl FnOnce(&mut Exam) -> Result<T, ExamError>,
    ) -> Result<T, StoreError> {
        let len = self.exams.len();
        let exam = self
            .exams
            .get_mut(index)
            .ok_or(StoreError::NoSuchExam { index, len })?;

        let previous = exam.clone();
        let value = change(&mut *exam)?;

        if let Err(error) = exam.save(&self.root) {
            *exam = previous;
            return Err(error.into());
        }

        Ok(value)
    }
}

fn collect_exam_paths(root: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => return Err(StoreError::Walk(error)),
            Err(error) => {
                tracing::debug!("Skipping unreadable directory entry: {error}");
                continue;
            }
        };

        let path = entry.into_path();
        if path.is_file() && path.extension() == Some(OsStr::new(EXAM_FILE_EXTENSION)) {
            paths.push(path);
        }
    }

    Ok(paths)
}

/// A file in the exams directory that was not loaded.
#[derive(Debug)]
pub struct SkippedFile {
    /// The skipped file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Why a file was skipped while loading.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    /// The file could not be read or is not an exam.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The exam inside is named differently from the file.
    #[error("the file holds an exam named '{0}'")]
    NameMismatch(ExamName),
}

/// Errors from [`ExamStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The exams directory could not be created.
    #[error("failed to create exams directory {}: {source}", .path.display())]
    Io {
        /// The exams directory.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The exams directory could not be listed.
    #[error("failed to list exams directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// No exam exists at the given index.
    #[error("no exam at index {index} (store has {len} exams)")]
    NoSuchExam {
        /// The requested index.
        index: usize,
        /// The number of exams in the store.
        len: usize,
    },
    /// No exam has the given name.
    #[error("no exam named '{0}'")]
    UnknownExam(String),
    /// An exam with this name already exists.
    #[error("an exam named '{0}' already exists")]
    DuplicateName(ExamName),
    /// A file is already in the way of a new exam.
    #[error("{} already exists", .0.display())]
    FileExists(PathBuf),
    /// A problem could not be addressed.
    #[error(transparent)]
    Exam(#[from] ExamError),
    /// An exam file could not be written.
    #[error(transparent)]
    Save(#[from] SaveError),
    /// The export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup_temp_store() -> (TempDir, ExamStore) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let store = ExamStore::load_all(tmp.path()).unwrap();
        (tmp, store)
    }

    fn name(name: &str) -> ExamName {
        ExamName::try_from(name).unwrap()
    }

    fn reload(store: &ExamStore) -> ExamStore {
        ExamStore::load_all(store.root()).unwrap()
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let (_tmp, store) = setup_temp_store();
        assert!(store.is_empty());
        assert!(store.skipped().is_empty());
    }

    #[test]
    fn missing_directory_is_created() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("exams");

        let store = ExamStore::load_all(&root).unwrap();

        assert!(root.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn created_exam_is_persisted() {
        let (_tmp, mut store) = setup_temp_store();

        store.create_exam(name("Midterm")).unwrap();

        assert!(store.root().join("Midterm.json").exists());
        let reloaded = reload(&store);
        assert_eq!(reloaded.exams(), store.exams());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Midterm")).unwrap();

        let error = store.create_exam(name("Midterm")).unwrap_err();

        assert!(matches!(error, StoreError::DuplicateName(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_problem_is_saved_immediately() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Quiz")).unwrap();

        let exam = store.add_problem(0, Problem::create_default()).unwrap();
        assert_eq!(exam.problems().len(), 1);

        let reloaded = reload(&store);
        assert_eq!(reloaded.exam(0).unwrap().problems().len(), 1);
    }

    #[test]
    fn remove_problem_is_saved_immediately() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Quiz")).unwrap();
        for statement in ["a", "b", "c"] {
            let problem = Problem::new(statement.to_string(), Vec::new(), String::new(), 1.0);
            store.add_problem(0, problem).unwrap();
        }

        let removed = store.remove_problem(0, 1).unwrap();
        assert_eq!(removed.statement(), "b");

        let reloaded = reload(&store);
        let statements: Vec<_> = reloaded
            .exam(0)
            .unwrap()
            .problems()
            .iter()
            .map(Problem::statement)
            .collect();
        assert_eq!(statements, ["a", "c"]);
    }

    #[test]
    fn edit_problem_is_saved_immediately() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Quiz")).unwrap();
        store.add_problem(0, Problem::create_default()).unwrap();

        store
            .edit_problem(0, 0, "1+1=?".to_string(), vec!["2".to_string()], "A".to_string(), 1.0)
            .unwrap();

        let reloaded = reload(&store);
        assert_eq!(reloaded.exam(0).unwrap().problems()[0].statement(), "1+1=?");
    }

    #[test]
    fn out_of_range_targets_are_rejected() {
        let (_tmp, mut store) = setup_temp_store();

        let error = store.add_problem(3, Problem::create_default()).unwrap_err();
        assert!(matches!(error, StoreError::NoSuchExam { index: 3, len: 0 }));

        store.create_exam(name("Quiz")).unwrap();
        let error = store.remove_problem(0, 0).unwrap_err();
        assert!(matches!(
            error,
            StoreError::Exam(ExamError::NoSuchProblem { index: 0, len: 0 })
        ));
    }

    #[test]
    fn failed_save_leaves_exam_unchanged() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Quiz")).unwrap();

        // A directory in place of the exam file makes the save fail.
        let path = store.root().join("Quiz.json");
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let error = store.add_problem(0, Problem::create_default()).unwrap_err();

        assert!(matches!(error, StoreError::Save(_)));
        assert!(store.exam(0).unwrap().problems().is_empty());
    }

    #[test]
    fn invalid_files_are_skipped() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Good")).unwrap();
        fs::write(store.root().join("broken.json"), "{ not json").unwrap();
        fs::write(store.root().join("nameless.json"), r#"{"problems": []}"#).unwrap();
        fs::write(store.root().join("notes.txt"), "ignored").unwrap();

        let reloaded = reload(&store);

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.exam(0).unwrap().name().as_str(), "Good");
        let skipped: Vec<_> = reloaded
            .skipped()
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(skipped, ["broken.json", "nameless.json"]);
    }

    #[test]
    fn file_named_differently_from_its_exam_is_skipped() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("Quiz")).unwrap();
        fs::write(
            store.root().join("copy.json"),
            r#"{"name": "Quiz", "problems": []}"#,
        )
        .unwrap();

        let reloaded = reload(&store);

        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.skipped().len(), 1);
        assert!(reloaded.skipped()[0].path.ends_with("copy.json"));
        assert!(matches!(
            reloaded.skipped()[0].reason,
            SkipReason::NameMismatch(_)
        ));
    }

    #[test]
    fn edits_survive_reload_next_to_a_misnamed_file() {
        let (_tmp, store) = setup_temp_store();
        fs::write(
            store.root().join("Final.json"),
            r#"{"name": "Midterm", "problems": []}"#,
        )
        .unwrap();
        let mut store = reload(&store);
        assert!(store.is_empty());

        store.create_exam(name("Midterm")).unwrap();
        store.add_problem(0, Problem::create_default()).unwrap();

        let reloaded = reload(&store);
        let index = reloaded.find("Midterm").unwrap();
        assert_eq!(reloaded.exam(index).unwrap().problems().len(), 1);
    }

    #[test]
    fn create_does_not_overwrite_a_skipped_file() {
        let (_tmp, store) = setup_temp_store();
        let misnamed = r#"{"name": "Midterm", "problems": []}"#;
        fs::write(store.root().join("Final.json"), misnamed).unwrap();
        let mut store = reload(&store);

        let error = store.create_exam(name("Final")).unwrap_err();

        assert!(matches!(error, StoreError::FileExists(_)));
        assert_eq!(
            fs::read_to_string(store.root().join("Final.json")).unwrap(),
            misnamed
        );
    }

    #[test]
    fn exams_load_in_file_name_order() {
        let (_tmp, mut store) = setup_temp_store();
        for exam in ["Charlie", "Alpha", "Bravo"] {
            store.create_exam(name(exam)).unwrap();
        }

        let reloaded = reload(&store);
        let names: Vec<_> = reloaded.exams().iter().map(|e| e.name().as_str()).collect();

        assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
    }

    #[test]
    fn find_resolves_names() {
        let (_tmp, mut store) = setup_temp_store();
        store.create_exam(name("A")).unwrap();
        store.create_exam(name("B")).unwrap();

        assert_eq!(store.find("B").unwrap(), 1);
        assert!(matches!(store.find("C"), Err(StoreError::UnknownExam(_))));
    }
}
