//! Export validity checks for problems.
//!
//! Two behaviors are supported. [`ValidationMode::Literal`] reproduces the
//! historical checks exactly, including their boundary quirks.
//! [`ValidationMode::Strict`] tightens the letter range check and numbers
//! problems the way the exported statement does.

use crate::{Exam, Problem, domain::problem::letter_index};

/// How strictly problems are checked before export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Historical behavior.
    ///
    /// The correct letter passes as long as its offset from `A` is not
    /// *greater* than the number of choices, so the letter one past the last
    /// choice is accepted, as is any character ordered before `A`. Latin-1
    /// codes above `0x7F` (such as `é`) and characters outside Latin-1 also
    /// rank below `A` and pass. A failure is reported with the number of
    /// problems that passed before it.
    #[default]
    Literal,
    /// The correct letter must name an existing choice, and a failure is
    /// reported with the 1-based problem number.
    Strict,
}

/// The reason a problem cannot be exported.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Defect {
    /// The statement is empty.
    #[error("the statement is empty")]
    EmptyStatement,
    /// There are no choices.
    #[error("there are no choices")]
    NoChoices,
    /// The correct choice is not exactly one character.
    #[error("the correct choice must be a single letter")]
    NotSingleLetter,
    /// The correct choice does not name one of the choices.
    #[error("correct choice {letter} does not match any of the {choices} choices")]
    OutOfRange {
        /// The correct choice as entered.
        letter: char,
        /// The number of choices.
        choices: usize,
    },
    /// The score is negative or not a finite number.
    #[error("the score must be a non-negative number, not {0}")]
    InvalidScore(f64),
}

/// A problem failed export validation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("problem {reported} is invalid: {defect}")]
pub struct InvalidProblem {
    /// The 0-based index of the failing problem.
    pub index: usize,
    /// The problem number shown to the user.
    ///
    /// This depends on the [`ValidationMode`].
    pub reported: usize,
    /// What is wrong with the problem.
    pub defect: Defect,
}

/// Check a single problem.
///
/// # Errors
///
/// Returns the first [`Defect`] found.
pub fn check_problem(problem: &Problem, mode: ValidationMode) -> Result<(), Defect> {
    if problem.statement().is_empty() {
        return Err(Defect::EmptyStatement);
    }

    let choices = problem.choices().len();
    if choices == 0 {
        return Err(Defect::NoChoices);
    }

    // One UTF-16 unit, so characters outside the Basic Multilingual Plane
    // count as two.
    let answer = problem.correct_choice();
    let (1, Some(letter)) = (answer.encode_utf16().count(), answer.chars().next()) else {
        return Err(Defect::NotSingleLetter);
    };

    let in_range = match mode {
        ValidationMode::Literal => latin1_offset(letter) <= i64::try_from(choices).unwrap_or(i64::MAX),
        ValidationMode::Strict => letter_index(letter).is_some_and(|index| index < choices),
    };

    if !in_range {
        return Err(Defect::OutOfRange { letter, choices });
    }

    let score = problem.score();
    if score.is_finite() && score >= 0.0 {
        Ok(())
    } else {
        Err(Defect::InvalidScore(score))
    }
}

/// Check every problem of `exam`, in order, stopping at the first failure.
///
/// # Errors
///
/// Returns [`InvalidProblem`] describing the first problem that fails.
pub fn validate(exam: &Exam, mode: ValidationMode) -> Result<(), InvalidProblem> {
    for (index, problem) in exam.problems().iter().enumerate() {
        if let Err(defect) = check_problem(problem, mode) {
            let reported = match mode {
                // Counts the problems that passed, which is the 0-based index.
                ValidationMode::Literal => index,
                ValidationMode::Strict => index + 1,
            };
            tracing::debug!("Problem {} of '{}' is invalid: {defect}", index + 1, exam.name());
            return Err(InvalidProblem {
                index,
                reported,
                defect,
            });
        }
    }

    Ok(())
}

/// Offset of `letter` from `A`, using its Latin-1 code as a signed byte.
///
/// Codes `0x80..=0xFF` are negative, and characters outside Latin-1 count as
/// code 0, so both always come out below `A`.
fn latin1_offset(letter: char) -> i64 {
    let code = u8::try_from(letter).map_or(0, |byte| i64::from(i8::from_ne_bytes([byte])));
    code - i64::from(b'A')
}
