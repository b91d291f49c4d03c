use std::path::PathBuf;

use clap::Parser;
use hexam::Exam;
use serde::Serialize;
use tracing::instrument;

use super::{Workspace, terminal::Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "List exams with their problem counts")]
pub struct List {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One exam as shown by `list`.
#[derive(Debug, Serialize)]
struct Row {
    name: String,
    problems: usize,
    total_score: f64,
    file: PathBuf,
}

impl Row {
    fn new(exam: &Exam, workspace: &Workspace) -> Self {
        Self {
            name: exam.name().to_string(),
            problems: exam.problems().len(),
            total_score: exam.problems().iter().map(hexam::Problem::score).sum(),
            file: exam.path_in(workspace.store.root()),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let rows: Vec<Row> = workspace
            .store
            .exams()
            .iter()
            .map(|exam| Row::new(exam, &workspace))
            .collect();

        match self.output {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &rows)?;
                println!();
            }
            OutputFormat::Table => Self::output_table(&rows),
        }

        Ok(())
    }

    fn output_table(rows: &[Row]) {
        if rows.is_empty() {
            println!("No exams found yet. Create one with 'hexam create <NAME>'.");
            return;
        }

        let width = rows
            .iter()
            .map(|row| row.name.chars().count())
            .max()
            .unwrap_or_default()
            .max("Exam".len());

        println!(
            "{}",
            format!("{:<width$}  {:>8}  {:>6}", "Exam", "Problems", "Score").info()
        );
        for row in rows {
            println!(
                "{:<width$}  {:>8}  {:>6}",
                row.name, row.problems, row.total_score
            );
        }
        println!();
        println!("{}", format!("{} exams", rows.len()).dim());
    }
}
