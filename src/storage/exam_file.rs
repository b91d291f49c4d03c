use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    Exam,
    storage::record::{ExamRecord, RecordError},
};

/// File extension of exam files.
pub const EXAM_FILE_EXTENSION: &str = "json";

/// Writes the exam to `path`, truncating any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save_to_path(exam: &Exam, path: &Path) -> Result<(), SaveError> {
    let io_error = |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ExamRecord::from(exam))?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)
}

/// Reads an exam from the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not valid JSON, or does
/// not hold a usable exam record.
pub fn load(path: &Path) -> Result<Exam, LoadError> {
    let file = File::open(path).map_err(|io_error| match io_error.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound,
        _ => LoadError::Io(io_error),
    })?;

    let record: Value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Exam::from_record(&record)?)
}

/// Errors that can occur when loading an exam file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The exam file was not found.
    #[error("exam file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read exam file: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid JSON.
    #[error("exam file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON does not describe an exam.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Errors that can occur when saving an exam file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The exam file could not be written.
    #[error("failed to write exam file {}: {source}", .path.display())]
    Io {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The exam could not be serialized.
    #[error("failed to serialize exam: {0}")]
    Json(#[from] serde_json::Error),
}
