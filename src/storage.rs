/// The exams directory as a whole.
pub mod store;
/// JSON exam files.
pub mod exam_file;
pub(crate) mod record;

pub use exam_file::{EXAM_FILE_EXTENSION, LoadError, SaveError};
pub use record::RecordError;
pub use store::{ExamStore, SkipReason, SkippedFile, StoreError};
