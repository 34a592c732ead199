//! `qct exg` command - Exigence management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, resolve_exigence, rule_summary, truncate_str};
use crate::core::identity::EntityId;
use crate::core::registry::ExigencePayload;
use crate::entities::exigence::{ChecklistItem, ChecklistItemKind, SampleRule};
use crate::store::Workspace;

#[derive(Subcommand, Debug)]
pub enum ExgCommands {
    /// List exigences
    List(ListArgs),

    /// Create a new exigence
    New(NewArgs),

    /// Show an exigence's details
    Show(ShowArgs),

    /// Edit an exigence (merges fields, identity preserved)
    Edit(EditArgs),

    /// Delete an exigence and every order referencing it
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
    /// Display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Short code (e.g. STD-CTRL)
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Pieces covered by one sample
    #[arg(long, value_name = "N")]
    pub pieces_per_sample: Option<u32>,

    /// Minimum number of samples
    #[arg(long, value_name = "N")]
    pub min_samples: Option<u32>,

    /// Maximum number of samples
    #[arg(long, value_name = "N")]
    pub max_samples: Option<u32>,

    /// Add a pass/fail checklist item (repeatable)
    #[arg(long = "check", value_name = "LABEL")]
    pub checks: Vec<String>,

    /// Add a free-text checklist item (repeatable)
    #[arg(long = "text-check", value_name = "LABEL")]
    pub text_checks: Vec<String>,

    /// Use interactive wizard to fill in fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Exigence ID or code
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Exigence ID or code
    pub id: String,

    /// New display name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New short code
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New pieces-per-sample value
    #[arg(long, value_name = "N")]
    pub pieces_per_sample: Option<u32>,

    /// New minimum number of samples
    #[arg(long, value_name = "N")]
    pub min_samples: Option<u32>,

    /// New maximum number of samples
    #[arg(long, value_name = "N")]
    pub max_samples: Option<u32>,

    /// Replace the checklist with these pass/fail items (repeatable)
    #[arg(long = "check", value_name = "LABEL")]
    pub checks: Vec<String>,

    /// Replace the checklist with these free-text items (repeatable)
    #[arg(long = "text-check", value_name = "LABEL")]
    pub text_checks: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Exigence ID or code
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ExgCommands) -> Result<()> {
    match cmd {
        ExgCommands::List(args) => run_list(args),
        ExgCommands::New(args) => run_new(args),
        ExgCommands::Show(args) => run_show(args),
        ExgCommands::Edit(args) => run_edit(args),
        ExgCommands::Delete(args) => run_delete(args),
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;

    let exigences = registry.exigences();
    if args.count {
        println!("{}", exigences.len());
        return Ok(());
    }
    if exigences.is_empty() {
        println!("No exigences found.");
        return Ok(());
    }

    println!(
        "{:<17} {:<12} {:<30} {:<36} CHECKS",
        "ID", "CODE", "NAME", "RULE"
    );
    for exigence in exigences.iter().take(args.limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<17} {:<12} {:<30} {:<36} {}",
            format_short_id(&exigence.id),
            truncate_str(&exigence.code, 12),
            truncate_str(&exigence.name, 30),
            truncate_str(&rule_summary(&exigence.sample_rule), 36),
            exigence.checklist.len()
        );
    }
    println!("\n{} exigence(s) found", exigences.len());
    Ok(())
}

fn run_new(args: NewArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let payload = if args.interactive {
        wizard_payload(None)?
    } else {
        let name = args.name.unwrap_or_default();
        let code = args.code.unwrap_or_default();
        let rule = SampleRule {
            pieces_per_sample: args.pieces_per_sample,
            min_samples: args.min_samples,
            max_samples: args.max_samples,
        };
        let checklist = build_checklist(&args.checks, &args.text_checks);
        validated_payload(None, name, code, args.description, rule, checklist)?
    };

    let code = payload.code.clone();
    let id = registry.upsert_exigence(payload);
    workspace.save(&registry).into_diagnostic()?;

    println!(
        "{} exigence {} ({})",
        style("Created").green().bold(),
        id,
        code
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let registry = workspace.load().into_diagnostic()?;
    let exigence = resolve_exigence(&registry, &args.id)?;

    println!(
        "\n{} {}",
        style(&exigence.name).bold().underlined(),
        style(format!("({})", exigence.code)).dim()
    );
    println!("ID:       {}", exigence.id);
    if let Some(description) = &exigence.description {
        println!("About:    {}", description);
    }
    println!("Sampling: {}", rule_summary(&exigence.sample_rule));
    println!("\nChecklist:");
    for (index, item) in exigence.checklist.iter().enumerate() {
        println!("  {}. {} [{}]", index + 1, item.label, item.kind);
        if let Some(guidance) = &item.guidance {
            println!("     {}", style(guidance).dim());
        }
    }

    let referencing = registry
        .orders()
        .iter()
        .filter(|o| o.exigence_id == exigence.id)
        .count();
    println!("\nReferenced by {} order(s)", referencing);
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let existing = resolve_exigence(&registry, &args.id)?.clone();
    let rule = SampleRule {
        pieces_per_sample: args
            .pieces_per_sample
            .or(existing.sample_rule.pieces_per_sample),
        min_samples: args.min_samples.or(existing.sample_rule.min_samples),
        max_samples: args.max_samples.or(existing.sample_rule.max_samples),
    };
    // Any checklist flag replaces the whole list; otherwise it is kept as-is
    let checklist = if args.checks.is_empty() && args.text_checks.is_empty() {
        existing.checklist.clone()
    } else {
        build_checklist(&args.checks, &args.text_checks)
    };

    let payload = validated_payload(
        Some(existing.id.clone()),
        args.name.unwrap_or(existing.name),
        args.code.unwrap_or(existing.code),
        args.description.or(existing.description),
        rule,
        checklist,
    )?;

    let id = registry.upsert_exigence(payload);
    workspace.save(&registry).into_diagnostic()?;

    println!("{} exigence {}", style("Updated").green().bold(), id);
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;

    let exigence = resolve_exigence(&registry, &args.id)?;
    let id = exigence.id.clone();
    let name = exigence.name.clone();
    let referencing = registry
        .orders()
        .iter()
        .filter(|o| o.exigence_id == id)
        .count();

    if !args.yes {
        let prompt = format!(
            "Delete exigence \"{}\" and its {} linked order(s)?",
            name, referencing
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let (_, cascaded) = registry.delete_exigence(&id);
    workspace.save(&registry).into_diagnostic()?;

    println!(
        "{} exigence {} and {} linked order(s)",
        style("Deleted").red().bold(),
        id,
        cascaded
    );
    Ok(())
}

/// Validate caller-side preconditions and normalize the payload.
/// The registry itself does not re-validate.
fn validated_payload(
    id: Option<EntityId>,
    name: String,
    code: String,
    description: Option<String>,
    rule: SampleRule,
    checklist: Vec<ChecklistItem>,
) -> Result<ExigencePayload> {
    let name = name.trim().to_string();
    let code = code.trim().to_string();
    if name.is_empty() {
        bail!("exigence name is required");
    }
    if code.is_empty() {
        bail!("exigence code is required");
    }
    if checklist.is_empty() {
        bail!("add at least one checklist item (--check or --text-check)");
    }
    if checklist.iter().any(|item| item.label.trim().is_empty()) {
        bail!("checklist item labels must not be empty");
    }

    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(ExigencePayload {
        id,
        name,
        code,
        description,
        sample_rule: rule.clamped(),
        checklist,
    })
}

fn build_checklist(checks: &[String], text_checks: &[String]) -> Vec<ChecklistItem> {
    let mut checklist: Vec<ChecklistItem> = checks
        .iter()
        .map(|label| ChecklistItem::new(label.trim(), ChecklistItemKind::PassFail))
        .collect();
    checklist.extend(
        text_checks
            .iter()
            .map(|label| ChecklistItem::new(label.trim(), ChecklistItemKind::Text)),
    );
    checklist
}

fn wizard_payload(id: Option<EntityId>) -> Result<ExigencePayload> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Name")
        .interact_text()
        .into_diagnostic()?;
    let code: String = Input::with_theme(&theme)
        .with_prompt("Code")
        .interact_text()
        .into_diagnostic()?;
    let description: String = Input::with_theme(&theme)
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let pieces_per_sample: u32 = Input::with_theme(&theme)
        .with_prompt("Pieces per sample")
        .default(30)
        .interact_text()
        .into_diagnostic()?;
    let min_samples: u32 = Input::with_theme(&theme)
        .with_prompt("Minimum samples")
        .default(1)
        .interact_text()
        .into_diagnostic()?;
    let max_samples: u32 = Input::with_theme(&theme)
        .with_prompt("Maximum samples")
        .default(10)
        .interact_text()
        .into_diagnostic()?;

    let mut checklist = Vec::new();
    loop {
        let label: String = Input::with_theme(&theme)
            .with_prompt("Checklist item label")
            .interact_text()
            .into_diagnostic()?;
        let kind_index = Select::with_theme(&theme)
            .with_prompt("Item kind")
            .items(&["pass/fail", "free text"])
            .default(0)
            .interact()
            .into_diagnostic()?;
        let kind = if kind_index == 0 {
            ChecklistItemKind::PassFail
        } else {
            ChecklistItemKind::Text
        };
        let guidance: String = Input::with_theme(&theme)
            .with_prompt("Operator guidance (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        let mut item = ChecklistItem::new(label.trim(), kind);
        if !guidance.trim().is_empty() {
            item = item.with_guidance(guidance.trim());
        }
        checklist.push(item);

        let more = Confirm::with_theme(&theme)
            .with_prompt("Add another checklist item?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !more {
            break;
        }
    }

    validated_payload(
        id,
        name,
        code,
        Some(description),
        SampleRule {
            pieces_per_sample: Some(pieces_per_sample),
            min_samples: Some(min_samples),
            max_samples: Some(max_samples),
        },
        checklist,
    )
}
