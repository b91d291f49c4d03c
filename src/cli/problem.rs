use std::path::PathBuf;

use hexam::Problem;
use tracing::instrument;

use super::{Workspace, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: ProblemCommand,
}

#[derive(Debug, clap::Parser)]
enum ProblemCommand {
    /// Append a placeholder problem to an exam
    Add(Add),

    /// Remove a problem from an exam
    Remove(Remove),

    /// Change the fields of a problem
    ///
    /// Fields that are not given keep their current value.
    Edit(Edit),
}

impl Command {
    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;

        match self.command {
            ProblemCommand::Add(add) => add.run(&mut workspace),
            ProblemCommand::Remove(remove) => remove.run(&mut workspace),
            ProblemCommand::Edit(edit) => edit.run(&mut workspace),
        }
    }
}

#[derive(Debug, clap::Parser)]
struct Add {
    /// The name of the exam
    exam: String,
}

impl Add {
    fn run(self, workspace: &mut Workspace) -> anyhow::Result<()> {
        let index = workspace.find(&self.exam)?;
        let exam = workspace
            .store
            .add_problem(index, Problem::create_default())?;

        println!(
            "{}",
            format!(
                "Added problem {} to '{}'",
                exam.problems().len(),
                exam.name()
            )
            .success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Remove {
    /// The name of the exam
    exam: String,

    /// The problem to remove (1-based)
    #[clap(value_parser = super::parse_problem_number)]
    problem: usize,
}

impl Remove {
    fn run(self, workspace: &mut Workspace) -> anyhow::Result<()> {
        let index = workspace.find(&self.exam)?;
        let removed = workspace.store.remove_problem(index, self.problem)?;

        println!(
            "{}",
            format!("Removed problem {} from '{}'", self.problem + 1, self.exam).success()
        );
        if !removed.statement().is_empty() {
            println!("{}", removed.statement().dim());
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
struct Edit {
    /// The name of the exam
    exam: String,

    /// The problem to edit (1-based)
    #[clap(value_parser = super::parse_problem_number)]
    problem: usize,

    /// The problem statement
    #[arg(long, short)]
    statement: Option<String>,

    /// A choice; repeat for each choice, in order
    ///
    /// When given, replaces all existing choices.
    #[arg(long = "choice", short = 'c', value_name = "CHOICE")]
    choices: Vec<String>,

    /// The letter of the correct choice
    #[arg(long, short)]
    answer: Option<String>,

    /// The score awarded for the correct choice
    #[arg(long, value_parser = parse_score, allow_negative_numbers = true)]
    score: Option<f64>,
}

/// Parse a score, which must be a non-negative number.
fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if score.is_finite() && score >= 0.0 {
        Ok(score)
    } else {
        Err(format!("score must be a non-negative number, not {s}"))
    }
}

impl Edit {
    fn run(self, workspace: &mut Workspace) -> anyhow::Result<()> {
        let index = workspace.find(&self.exam)?;
        let current = workspace.store.exam(index)?.problem(self.problem)?;

        let statement = self
            .statement
            .unwrap_or_else(|| current.statement().to_string());
        let choices = if self.choices.is_empty() {
            current.choices().to_vec()
        } else {
            self.choices
        };
        let answer = self
            .answer
            .unwrap_or_else(|| current.correct_choice().to_string());
        let score = self.score.unwrap_or(current.score());

        workspace
            .store
            .edit_problem(index, self.problem, statement, choices, answer, score)?;

        println!(
            "{}",
            format!("Updated problem {} of '{}'", self.problem + 1, self.exam).success()
        );
        Ok(())
    }
}
