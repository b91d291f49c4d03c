use std::{
    fs,
    path::{Path, PathBuf},
};

mod export;
mod list;
mod problem;
mod show;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use export::Export;
use hexam::{CONFIG_FILE_NAME, Config, ExamName, ExamStore};
use list::List;
use show::Show;
use terminal::Colorize;
use tracing::instrument;
use validate::Validate;

/// Parse a 1-based problem number into a 0-based index.
fn parse_problem_number(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("problem numbers start at 1".to_string()),
        Ok(number) => Ok(number - 1),
        Err(e) => Err(format!("{e}")),
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the exam workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List exams (default)
    List(List),

    /// Initialize a new exam workspace
    Init,

    /// Create a new, empty exam
    Create(Create),

    /// Show the problems of an exam, or a single problem
    Show(Show),

    /// Add, remove or edit problems
    Problem(problem::Command),

    /// Check that an exam can be exported
    Validate(Validate),

    /// Export an exam as a Hydro objective problem
    Export(Export),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Create(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Problem(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::Export(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// A loaded exam workspace: its configuration and exams.
struct Workspace {
    root: PathBuf,
    config: Config,
    store: ExamStore,
}

impl Workspace {
    /// Load the workspace at `root`, warning about any skipped exam files.
    fn open(root: PathBuf) -> anyhow::Result<Self> {
        let config = Config::load_or_default(&root);
        let exams_dir = config.exams_dir(&root);
        let store = ExamStore::load_all(&exams_dir)
            .with_context(|| format!("failed to load exams from {}", exams_dir.display()))?;

        for skipped in store.skipped() {
            eprintln!("{}", format!("warning: skipped {skipped}").warning());
        }

        Ok(Self {
            root,
            config,
            store,
        })
    }

    /// The index of the exam called `name`.
    fn find(&self, name: &str) -> anyhow::Result<usize> {
        Ok(self.store.find(name)?)
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            anyhow::bail!(
                "Workspace already initialized (found existing {CONFIG_FILE_NAME})"
            );
        }

        let config = Config::default();
        config
            .save(&config_path)
            .with_context(|| format!("failed to create {CONFIG_FILE_NAME}"))?;

        let exams_dir = config.exams_dir(root);
        fs::create_dir_all(&exams_dir)
            .with_context(|| format!("failed to create {}", exams_dir.display()))?;

        println!("Initialized exam workspace in {}", root.display());
        println!("  Created: {CONFIG_FILE_NAME}");
        println!("  Created: {}", exams_dir.display());
        println!();
        println!("Next steps:");
        println!("  hexam create \"Your First Exam\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Create {
    /// The name of the exam; also its file name
    name: ExamName,
}

impl Create {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let exams_dir = workspace.store.root().to_path_buf();
        let exam = workspace.store.create_exam(self.name)?;

        println!(
            "{}",
            format!("Created exam '{}'", exam.name()).success()
        );
        println!("{}", exam.path_in(&exams_dir).display().to_string().dim());

        Ok(())
    }
}
