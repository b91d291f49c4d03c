use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// Characters that are never allowed in an exam name.
///
/// The name doubles as the file stem of the exam's JSON file, so anything a
/// common filesystem would reject or interpret is excluded.
const FORBIDDEN: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// A validated exam name.
///
/// Exam names are the persistence key of an exam (`<name>.json`), so they must
/// be non-empty and safe to use as a file name on any platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExamName(NonEmptyString);

impl ExamName {
    /// Creates a new `ExamName`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or blank, is `.` or `..`, or
    /// contains a path separator, a control character, or one of `<>:"|?*`.
    pub fn new(name: String) -> Result<Self, InvalidNameError> {
        if name.trim().is_empty() {
            return Err(InvalidNameError::Empty);
        }

        if name == "." || name == ".." {
            return Err(InvalidNameError::Reserved(name));
        }

        if let Some(ch) = name
            .chars()
            .find(|c| c.is_control() || FORBIDDEN.contains(c))
        {
            return Err(InvalidNameError::ForbiddenChar { name, ch });
        }

        NonEmptyString::new(name)
            .map(Self)
            .map_err(|_| InvalidNameError::Empty)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ExamName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ExamName {
    type Error = InvalidNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for ExamName {
    type Err = InvalidNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for ExamName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for ExamName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for ExamName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a usable exam name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidNameError {
    /// The name is empty or only whitespace.
    #[error("exam name must not be empty")]
    Empty,
    /// The name is a reserved path component.
    #[error("'{0}' is not a valid exam name")]
    Reserved(String),
    /// The name contains a character that is unsafe in a file name.
    #[error("exam name '{name}' contains the forbidden character {ch:?}")]
    ForbiddenChar {
        /// The rejected name.
        name: String,
        /// The first offending character.
        ch: char,
    },
}
