use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::Context;
use clap::Parser;
use hexam::{ExportOptions, ValidationMode, export};
use tracing::instrument;

use super::{Workspace, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Export an exam as a Hydro objective problem")]
pub struct Export {
    /// The name of the exam
    exam: String,

    /// The Hydro problem ID; prompted for when not given
    #[arg(long)]
    pid: Option<String>,

    /// Validate strictly (see `hexam validate --strict`)
    #[arg(long)]
    strict: bool,

    /// Open the export directory afterwards
    #[arg(long)]
    reveal: bool,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let (index, options) = self.prepare(&workspace)?;

        let pid = match self.pid {
            Some(pid) => pid,
            None => prompt_pid()?,
        };

        let dir = workspace.store.export(index, pid.trim(), &options)?;

        println!(
            "{}",
            format!("Exported '{}'", self.exam).success()
        );
        println!("{}", dir.display().to_string().info());

        if self.reveal {
            reveal(&dir)?;
        }

        Ok(())
    }

    /// Resolve the exam and export options, and validate the exam so that
    /// problems are reported before the user is asked for a PID.
    fn prepare(&self, workspace: &Workspace) -> anyhow::Result<(usize, ExportOptions)> {
        let index = workspace.find(&self.exam)?;

        let mut options = workspace.config.export_options(&workspace.root);
        if self.strict {
            options.mode = ValidationMode::Strict;
        }

        export::validate(workspace.store.exam(index)?, options.mode)?;

        Ok((index, options))
    }
}

fn prompt_pid() -> anyhow::Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt("Hydro problem ID")
        .allow_empty(true)
        .interact_text()
        .context("failed to read the problem ID")
}

/// Open `dir` with the platform's file manager.
fn reveal(dir: &Path) -> anyhow::Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    process::Command::new(opener)
        .arg(dir)
        .status()
        .with_context(|| format!("failed to launch '{opener}'"))?;

    // explorer exits non-zero even on success
    Ok(())
}
