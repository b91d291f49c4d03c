use std::fmt::Write as _;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::Exam;

/// `problem.yaml`: identifies the problem on Hydro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDescriptor {
    /// The Hydro problem ID.
    pub pid: String,
    /// The Hydro user ID that owns the problem.
    pub owner: i64,
    /// The problem title; the exam name.
    pub title: String,
}

/// `testdata/config.yaml`: the objective judge's answer key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingConfig {
    #[serde(rename = "type")]
    kind: &'static str,
    answers: Answers,
}

impl GradingConfig {
    /// The answer key for `exam`.
    ///
    /// Problems are keyed by their 1-based number, as a string.
    #[must_use]
    pub fn for_exam(exam: &Exam) -> Self {
        let answers = exam
            .problems()
            .iter()
            .enumerate()
            .map(|(index, problem)| {
                (
                    (index + 1).to_string(),
                    Answer(problem.correct_choice().to_string(), Score(problem.score())),
                )
            })
            .collect();

        Self {
            kind: "objective",
            answers: Answers(answers),
        }
    }
}

/// Answers keyed by problem number, kept in problem order.
#[derive(Debug, Clone, PartialEq)]
struct Answers(Vec<(String, Answer)>);

impl Serialize for Answers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (number, answer) in &self.0 {
            map.serialize_entry(number, answer)?;
        }
        map.end()
    }
}

/// `[letter, score]`
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Answer(String, Score);

/// A score, written as an integer when it has no fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Score(f64);

impl Serialize for Score {
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let score = self.0;
        if score.fract() == 0.0 && score.abs() < 1e15 {
            serializer.serialize_i64(score as i64)
        } else {
            serializer.serialize_f64(score)
        }
    }
}

/// `problem_zh.md`: the statement shown to candidates.
///
/// Each problem becomes its statement, a `{{ select(n) }}` answer widget and
/// its choices as a bulleted list.
#[must_use]
pub fn render_statement(exam: &Exam) -> String {
    let mut document = String::new();

    for (index, problem) in exam.problems().iter().enumerate() {
        let _ = write!(
            document,
            "{}\n\n{{{{ select({}) }}}}\n\n",
            problem.statement(),
            index + 1
        );
        for choice in problem.choices() {
            let _ = writeln!(document, "- {choice}");
        }
        document.push('\n');
    }

    document
}

/// The text of all three export artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Contents of `problem.yaml`.
    pub descriptor: String,
    /// Contents of `problem_zh.md`.
    pub statement: String,
    /// Contents of `testdata/config.yaml`.
    pub config: String,
}

impl Artifacts {
    /// Render the artifacts for `exam`.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML serialization fails.
    pub fn generate(exam: &Exam, pid: &str, owner: i64) -> Result<Self, serde_yaml::Error> {
        let descriptor = ProblemDescriptor {
            pid: pid.to_string(),
            owner,
            title: exam.name().to_string(),
        };

        Ok(Self {
            descriptor: serde_yaml::to_string(&descriptor)?,
            statement: render_statement(exam),
            config: serde_yaml::to_string(&GradingConfig::for_exam(exam))?,
        })
    }
}
