use std::path::PathBuf;

use clap::Parser;
use hexam::{ValidationMode, export};
use tracing::instrument;

use super::{Workspace, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check that every problem of an exam can be exported")]
pub struct Validate {
    /// The name of the exam
    exam: String,

    /// Require the answer to name an existing choice, and report 1-based
    /// problem numbers
    ///
    /// Overrides `strict_validation` in the workspace config.
    #[arg(long)]
    strict: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let exam = workspace.store.exam(workspace.find(&self.exam)?)?;

        let mode = if self.strict {
            ValidationMode::Strict
        } else {
            workspace.config.validation_mode()
        };

        export::validate(exam, mode)?;

        println!(
            "{}",
            format!(
                "✓ '{}' is ready to export ({} problems)",
                exam.name(),
                exam.problems().len()
            )
            .success()
        );
        Ok(())
    }
}
