//! `qct log` command - archived operation records
//!
//! Records are immutable and listed newest-first. `clear` is the only
//! administrative mutation; no edit or single delete exists.

use std::collections::HashMap;

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{miette, IntoDiagnostic, Result};

use crate::cli::helpers::{format_datetime, format_short_id, truncate_str};
use crate::core::identity::EntityId;
use crate::entities::exigence::ChecklistItem;
use crate::entities::operation::OperationRecord;
use crate::store::Workspace;

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// List operation records (newest first)
    List(ListArgs),

    /// Show one operation record in full
    Show(ShowArgs),

    /// Clear all operation records (administrative reset)
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Limit output to N records
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the records
    #[arg(long)]
    pub count: bool,

    /// Emit records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record ID, or a newest-first index (0 = most recent)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: LogCommands) -> Result<()> {
    match cmd {
        LogCommands::List(args) => run_list(args),
        LogCommands::Show(args) => run_show(args),
        LogCommands::Clear(args) => run_clear(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;

    let records = registry.operations();
    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    let shown: Vec<&OperationRecord> = records
        .iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&shown).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    if records.is_empty() {
        println!("No operation records found.");
        return Ok(());
    }

    println!(
        "{:<17} {:<20} {:<16} SAMPLES",
        "ID", "COMPLETED", "ORDER"
    );
    for record in &shown {
        println!(
            "{:<17} {:<20} {:<16} {}/{}",
            format_short_id(&record.id),
            format_datetime(record.completed_at),
            truncate_str(&record.order_number, 16),
            record.samples.len(),
            record.required_samples
        );
    }
    println!("\n{} operation record(s) found", records.len());
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;

    let record = find_record(registry.operations(), &args.id)?;

    // Labels resolve through the exigence when it still exists; records
    // outlive their configuration, so fall back to raw item IDs.
    let labels: HashMap<&EntityId, &ChecklistItem> = registry
        .exigence(&record.exigence_id)
        .map(|exigence| exigence.checklist.iter().map(|i| (&i.id, i)).collect())
        .unwrap_or_default();

    println!(
        "\n{} {}",
        style(format!("Order {}", record.order_number)).bold().underlined(),
        style(format!("({} pieces)", record.piece_count)).dim()
    );
    println!("ID:        {}", record.id);
    println!("Started:   {}", format_datetime(record.started_at));
    println!("Completed: {}", format_datetime(record.completed_at));
    println!(
        "Samples:   {}/{}",
        record.samples.len(),
        record.required_samples
    );

    for (index, sample) in record.samples.iter().enumerate() {
        println!(
            "\n  {} {} ({})",
            style("Sample").cyan().bold(),
            index + 1,
            sample.label
        );
        for response in &sample.responses {
            let label = labels
                .get(&response.item_id)
                .map(|item| item.label.as_str())
                .unwrap_or_else(|| response.item_id.as_str());
            println!("    {}: {}", label, response.value);
        }
    }
    Ok(())
}

fn run_clear(args: ClearArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let count = registry.operations().len();
    if count == 0 {
        println!("No operation records to clear.");
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Clear {} operation record(s)?", count))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let cleared = registry.clear_operations();
    workspace.save(&registry).into_diagnostic()?;

    println!(
        "{} {} operation record(s)",
        style("Cleared").red().bold(),
        cleared
    );
    Ok(())
}

fn find_record<'a>(records: &'a [OperationRecord], key: &str) -> Result<&'a OperationRecord> {
    if let Ok(index) = key.parse::<usize>() {
        return records
            .get(index)
            .ok_or_else(|| miette!("no operation record at index {} ({} stored)", index, records.len()));
    }
    let id = EntityId::parse(key).map_err(|e| miette!("{}", e))?;
    records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| miette!("no operation record with id {}", key))
}
