//! `hexam`: author multiple-choice exams and export them to Hydro.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
