use serde::Deserialize;
use serde_json::{Value, json};

use crate::storage::record::ProblemRecord;

const PLACEHOLDER_STATEMENT: &str =
    "Describe the problem here. Do not include the choices in the statement.";

/// A single multiple-choice question.
///
/// Choices are addressed by position internally and by letter externally:
/// the first choice is `A`, the second `B`, and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    statement: String,
    choices: Vec<String>,
    correct_choice: String,
    score: f64,
}

impl Problem {
    /// Construct a [`Problem`] from its parts.
    #[must_use]
    pub const fn new(
        statement: String,
        choices: Vec<String>,
        correct_choice: String,
        score: f64,
    ) -> Self {
        Self {
            statement,
            choices,
            correct_choice,
            score,
        }
    }

    /// A new problem filled with placeholder text.
    ///
    /// It has four placeholder choices, `A` as the correct choice, and a
    /// score of 2.
    #[must_use]
    pub fn create_default() -> Self {
        let choices = (0..4)
            .filter_map(choice_letter)
            .map(|letter| format!("Describe choice {letter}"))
            .collect();

        Self::new(
            PLACEHOLDER_STATEMENT.to_string(),
            choices,
            "A".to_string(),
            2.0,
        )
    }

    /// Build a problem from a JSON record.
    ///
    /// Deserialization is tolerant: a missing or mistyped field becomes an
    /// empty string, an empty list or zero, and a record that is not an
    /// object becomes an empty problem.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        ProblemRecord::deserialize(record)
            .unwrap_or_default()
            .into()
    }

    /// Serialize the problem to a JSON record.
    #[must_use]
    pub fn to_record(&self) -> Value {
        json!({
            "statement": self.statement,
            "choices": self.choices,
            "correctChoice": self.correct_choice,
            "score": self.score,
        })
    }

    /// Replace every field of the problem at once.
    pub fn edit(
        &mut self,
        statement: String,
        choices: Vec<String>,
        correct_choice: String,
        score: f64,
    ) {
        self.statement = statement;
        self.choices = choices;
        self.correct_choice = correct_choice;
        self.score = score;
    }

    /// The problem statement.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The choices, in display order.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// The letter of the correct choice, as entered.
    #[must_use]
    pub fn correct_choice(&self) -> &str {
        &self.correct_choice
    }

    /// The point value of the problem.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Iterate over the choices together with their letters.
    pub fn lettered_choices(&self) -> impl Iterator<Item = (char, &str)> {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(index, choice)| Some((choice_letter(index)?, choice.as_str())))
    }
}

/// The letter labelling the choice at `index` (`0` → `A`).
///
/// Returns `None` past `Z`.
#[must_use]
pub fn choice_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|offset| *offset < 26)
        .map(|offset| char::from(b'A' + offset))
}

/// The position of the choice labelled `letter` (`A` → `0`).
///
/// Only uppercase ASCII letters name a choice.
#[must_use]
pub fn letter_index(letter: char) -> Option<usize> {
    u8::try_from(letter)
        .ok()
        .filter(u8::is_ascii_uppercase)
        .map(|byte| usize::from(byte - b'A'))
}

impl From<ProblemRecord> for Problem {
    fn from(record: ProblemRecord) -> Self {
        Self::new(
            record.statement,
            record.choices,
            record.correct_choice,
            record.score,
        )
    }
}

impl From<&Problem> for ProblemRecord {
    fn from(problem: &Problem) -> Self {
        Self {
            statement: problem.statement.clone(),
            choices: problem.choices.clone(),
            correct_choice: problem.correct_choice.clone(),
            score: problem.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn sample() -> Problem {
        Problem::new(
            "2+2=?".to_string(),
            vec!["3".to_string(), "4".to_string(), "5".to_string()],
            "B".to_string(),
            5.0,
        )
    }

    #[test]
    fn default_problem_has_placeholders() {
        let problem = Problem::create_default();

        assert!(!problem.statement().is_empty());
        assert_eq!(problem.choices().len(), 4);
        assert!(problem.choices()[3].contains('D'));
        assert_eq!(problem.correct_choice(), "A");
        assert!((problem.score() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_round_trip() {
        let problem = sample();
        assert_eq!(Problem::from_record(&problem.to_record()), problem);
    }

    #[test]
    fn to_record_uses_camel_case_answer_key() {
        let record = sample().to_record();
        assert_eq!(record["correctChoice"], "B");
        assert_eq!(record["choices"], json!(["3", "4", "5"]));
    }

    #[test]
    fn missing_fields_degrade_to_empty_values() {
        let problem = Problem::from_record(&json!({ "statement": "only this" }));

        assert_eq!(problem.statement(), "only this");
        assert!(problem.choices().is_empty());
        assert_eq!(problem.correct_choice(), "");
        assert!(problem.score().abs() < f64::EPSILON);
    }

    #[test]
    fn mistyped_fields_degrade_to_empty_values() {
        let problem = Problem::from_record(&json!({
            "statement": 42,
            "choices": ["a", 7, null, "d"],
            "correctChoice": ["A"],
            "score": "five",
        }));

        assert_eq!(problem.statement(), "");
        assert_eq!(problem.choices(), ["a", "", "", "d"]);
        assert_eq!(problem.correct_choice(), "");
        assert!(problem.score().abs() < f64::EPSILON);
    }

    #[test]
    fn non_object_record_is_an_empty_problem() {
        let problem = Problem::from_record(&json!("not a problem"));
        assert_eq!(problem, Problem::new(String::new(), Vec::new(), String::new(), 0.0));
    }

    #[test]
    fn edit_replaces_every_field() {
        let mut problem = Problem::create_default();
        problem.edit(
            "2+2=?".to_string(),
            vec!["3".to_string(), "4".to_string(), "5".to_string()],
            "B".to_string(),
            5.0,
        );
        assert_eq!(problem, sample());
    }

    #[test]
    fn lettered_choices_label_in_order() {
        let problem = sample();
        let letters: Vec<_> = problem.lettered_choices().collect();
        assert_eq!(letters, [('A', "3"), ('B', "4"), ('C', "5")]);
    }

    #[test_case(0, Some('A'); "first")]
    #[test_case(25, Some('Z'); "last")]
    #[test_case(26, None; "past z")]
    fn choice_letters(index: usize, expected: Option<char>) {
        assert_eq!(choice_letter(index), expected);
    }

    #[test_case('A', Some(0); "first")]
    #[test_case('D', Some(3); "fourth")]
    #[test_case('a', None; "lowercase")]
    #[test_case('1', None; "digit")]
    fn letter_indices(letter: char, expected: Option<usize>) {
        assert_eq!(letter_index(letter), expected);
    }
}
