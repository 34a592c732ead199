//! Top-level CLI definition

use clap::{Parser, Subcommand};

use crate::cli::commands::{control, exg, init, log, ord};

#[derive(Parser, Debug)]
#[command(
    name = "qct",
    version,
    about = "Quality Control Toolkit - sampling exigences, production orders and operator checklists"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a qct workspace with seed data
    Init(init::InitArgs),

    /// Manage exigences (sampling rules + checklists)
    #[command(subcommand)]
    Exg(exg::ExgCommands),

    /// Manage production orders
    #[command(subcommand)]
    Ord(ord::OrdCommands),

    /// Run an operator control session
    Control(control::ControlArgs),

    /// Browse archived operation records
    #[command(subcommand)]
    Log(log::LogCommands),
}
