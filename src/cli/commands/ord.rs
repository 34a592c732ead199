//! `qct ord` command - Production order management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, resolve_exigence, resolve_order, truncate_str};
use crate::core::identity::EntityId;
use crate::core::registry::OrderPayload;
use crate::core::sampling::required_samples;
use crate::store::Workspace;

#[derive(Subcommand, Debug)]
pub enum OrdCommands {
    /// List orders
    List(ListArgs),

    /// Create a new order
    New(NewArgs),

    /// Show an order's details
    Show(ShowArgs),

    /// Edit an order (merges fields, identity preserved)
    Edit(EditArgs),

    /// Delete an order
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Order number (the operator's scan key)
    #[arg(long, short = 'n')]
    pub number: String,

    /// Pieces in the order; non-integer values are floored
    #[arg(long, short = 'p')]
    pub pieces: f64,

    /// Referenced exigence (ID or code)
    #[arg(long, short = 'e')]
    pub exigence: String,

    /// Internal notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Order ID or order number
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Order ID or order number
    pub id: String,

    /// New order number
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    /// New piece count; non-integer values are floored
    #[arg(long, short = 'p')]
    pub pieces: Option<f64>,

    /// New exigence reference (ID or code)
    #[arg(long, short = 'e')]
    pub exigence: Option<String>,

    /// New internal notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Order ID or order number
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: OrdCommands) -> Result<()> {
    match cmd {
        OrdCommands::List(args) => run_list(args),
        OrdCommands::New(args) => run_new(args),
        OrdCommands::Show(args) => run_show(args),
        OrdCommands::Edit(args) => run_edit(args),
        OrdCommands::Delete(args) => run_delete(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;

    let orders = registry.orders();
    if args.count {
        println!("{}", orders.len());
        return Ok(());
    }
    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!(
        "{:<17} {:<16} {:>8} {:<28} SAMPLES",
        "ID", "NUMBER", "PIECES", "EXIGENCE"
    );
    for order in orders.iter().take(args.limit.unwrap_or(usize::MAX)) {
        let (exigence_name, samples) = match registry.exigence(&order.exigence_id) {
            Some(exigence) => (
                truncate_str(&exigence.name, 28),
                required_samples(order.piece_count, &exigence.sample_rule).to_string(),
            ),
            None => ("(missing)".to_string(), "-".to_string()),
        };
        println!(
            "{:<17} {:<16} {:>8} {:<28} {}",
            format_short_id(&order.id),
            truncate_str(&order.order_number, 16),
            order.piece_count,
            exigence_name,
            samples
        );
    }
    println!("\n{} order(s) found", orders.len());
    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let exigence_id = resolve_exigence(&registry, &args.exigence)?.id.clone();
    let payload = validated_payload(
        None,
        args.number,
        args.pieces,
        exigence_id,
        args.notes,
    )?;

    let number = payload.order_number.clone();
    let id = registry.upsert_order(payload);
    workspace.save(&registry).into_diagnostic()?;

    println!(
        "{} order {} ({})",
        style("Created").green().bold(),
        id,
        number
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;
    let order = resolve_order(&registry, &args.id)?;

    println!("\n{}", style(&order.order_number).bold().underlined());
    println!("ID:       {}", order.id);
    println!("Pieces:   {}", order.piece_count);
    match registry.exigence(&order.exigence_id) {
        Some(exigence) => {
            println!("Exigence: {} ({})", exigence.name, exigence.code);
            println!(
                "Samples:  {} required",
                required_samples(order.piece_count, &exigence.sample_rule)
            );
        }
        None => println!(
            "Exigence: {} (not configured)",
            style(order.exigence_id.as_str()).red()
        ),
    }
    if let Some(notes) = &order.notes {
        println!("Notes:    {}", notes);
    }
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let existing = resolve_order(&registry, &args.id)?.clone();
    let exigence_id = match &args.exigence {
        Some(key) => resolve_exigence(&registry, key)?.id.clone(),
        None => existing.exigence_id.clone(),
    };
    let pieces = args.pieces.unwrap_or(existing.piece_count as f64);

    let payload = validated_payload(
        Some(existing.id.clone()),
        args.number.unwrap_or(existing.order_number),
        pieces,
        exigence_id,
        args.notes.or(existing.notes),
    )?;

    let id = registry.upsert_order(payload);
    workspace.save(&registry).into_diagnostic()?;

    println!("{} order {}", style("Updated").green().bold(), id);
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let order = resolve_order(&registry, &args.id)?;
    let id = order.id.clone();
    let number = order.order_number.clone();

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete order \"{}\"?", number))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    registry.delete_order(&id);
    workspace.save(&registry).into_diagnostic()?;

    println!("{} order {} ({})", style("Deleted").red().bold(), id, number);
    Ok(())
}

/// Caller-side validation: non-empty trimmed order number, positive floored
/// piece count. The exigence reference is resolved before this is called.
fn validated_payload(
    id: Option<EntityId>,
    number: String,
    pieces: f64,
    exigence_id: EntityId,
    notes: Option<String>,
) -> Result<OrderPayload> {
    let number = number.trim().to_string();
    if number.is_empty() {
        bail!("order number is required");
    }
    if !pieces.is_finite() || pieces.floor() < 1.0 {
        bail!("piece count must be a positive number");
    }

    let notes = notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(OrderPayload {
        id,
        order_number: number,
        exigence_id,
        piece_count: pieces.floor() as u32,
        notes,
    })
}
