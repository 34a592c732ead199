//! `qct init` command - workspace initialization

use std::fs;
use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::store::{Workspace, WORKSPACE_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

pub fn run(args: InitArgs) -> Result<()> {
    fs::create_dir_all(&args.path).into_diagnostic()?;
    let workspace = Workspace::init(&args.path).into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;

    println!(
        "{} workspace in {}",
        style("Initialized").green().bold(),
        workspace.root().join(WORKSPACE_DIR).display()
    );
    println!(
        "Seeded {} exigence(s) and {} order(s); try `qct ord list`.",
        registry.exigences().len(),
        registry.orders().len()
    );
    Ok(())
}
