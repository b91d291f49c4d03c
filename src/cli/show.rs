use std::path::PathBuf;

use clap::Parser;
use hexam::{Exam, Problem};
use tracing::instrument;

use super::{
    Workspace,
    terminal::{Colorize, is_narrow, preview},
};

#[derive(Debug, Parser)]
#[command(about = "Display the problems of an exam")]
pub struct Show {
    /// The name of the exam
    exam: String,

    /// Show only this problem (1-based)
    #[clap(value_parser = super::parse_problem_number)]
    problem: Option<usize>,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let exam = workspace.store.exam(workspace.find(&self.exam)?)?;

        match self.problem {
            Some(index) => output_problem(index, exam.problem(index)?),
            None => output_exam(exam),
        }

        Ok(())
    }
}

fn output_exam(exam: &Exam) {
    println!("{}", exam.name().to_string().info());

    if exam.problems().is_empty() {
        println!(
            "No problems yet. Add one with 'hexam problem add \"{}\"'.",
            exam.name()
        );
        return;
    }

    let max = if is_narrow() { 12 } else { 40 };
    for (index, problem) in exam.problems().iter().enumerate() {
        let statement = if problem.statement().is_empty() {
            "(no statement)".dim()
        } else {
            preview(problem.statement(), max)
        };
        println!(
            "{:>3}. {statement}  {}",
            index + 1,
            format!("[{}, {}]", problem.correct_choice(), problem.score()).dim()
        );
    }
}

fn output_problem(index: usize, problem: &Problem) {
    println!("{}", format!("Problem {}", index + 1).info());
    println!();
    println!("{}", problem.statement());
    println!();

    for (letter, choice) in problem.lettered_choices() {
        let line = format!("  {letter}. {choice}");
        if problem.correct_choice() == letter.to_string() {
            println!("{}", format!("{line}  (correct)").success());
        } else {
            println!("{line}");
        }
    }
    if problem.choices().is_empty() {
        println!("{}", "  (no choices)".dim());
    }

    println!();
    println!("Answer: {}", problem.correct_choice());
    println!("Score:  {}", problem.score());
}
