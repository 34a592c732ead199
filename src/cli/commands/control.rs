//! `qct control` command - interactive operator session
//!
//! Scans an order number, resolves its exigence, then walks the operator
//! through the checklist once per required sample. Reaching the quota
//! archives the operation record and ends the session.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::session::{ControlSession, SessionProgress};
use crate::entities::exigence::{ChecklistItem, ChecklistItemKind};
use crate::entities::operation::ResponseValue;
use crate::store::Workspace;

#[derive(clap::Args, Debug)]
pub struct ControlArgs {
    /// Order number to scan (prompted when omitted)
    #[arg(long, short = 'o')]
    pub order: Option<String>,
}

pub fn run(args: ControlArgs) -> Result<()> {
    let workspace = Workspace::discover().into_diagnostic()?;
    let mut registry = workspace.load().into_diagnostic()?;
    let mut session = ControlSession::new();
    let theme = ColorfulTheme::default();

    let mut scan = match args.order {
        Some(order) => order,
        None => prompt_scan(&theme)?,
    };

    // Retry the scan until an order and its exigence resolve
    let (order_number, exigence_name, piece_count, required, checklist) = loop {
        match session.start(&scan, &registry) {
            Ok(active) => {
                break (
                    active.order().order_number.clone(),
                    active.exigence().name.clone(),
                    active.order().piece_count,
                    active.required_samples(),
                    active.exigence().checklist.clone(),
                )
            }
            Err(err) => {
                eprintln!("{} {}", style("✗").red(), err);
                scan = prompt_scan(&theme)?;
            }
        }
    };

    println!("\n{}", style("Control session").bold().underlined());
    println!("Order:    {}", order_number);
    println!("Exigence: {}", exigence_name);
    println!("Pieces:   {}", piece_count);
    println!("Samples:  {} required", required);

    while session.is_active() {
        let current = session
            .active()
            .map(|a| a.samples().len() as u32)
            .unwrap_or(0);
        println!(
            "\n{} {} of {}",
            style("Sample").cyan().bold(),
            current + 1,
            required
        );

        let label: String = Input::with_theme(&theme)
            .with_prompt("Sample label")
            .interact_text()
            .into_diagnostic()?;

        collect_responses(&mut session, &checklist, &theme)?;

        match session.save_sample(&label) {
            Ok(SessionProgress::Sampling { saved, remaining }) => {
                println!(
                    "{} sample {}/{} ({} remaining)",
                    style("Saved").green().bold(),
                    saved,
                    required,
                    remaining
                );
            }
            Ok(SessionProgress::Completed(record)) => {
                let record_id = record.id.clone();
                registry.log_operation(record);
                workspace.save(&registry).into_diagnostic()?;
                println!(
                    "\n{} {}/{} samples; control archived as {}",
                    style("Completed").green().bold(),
                    required,
                    required,
                    record_id
                );
            }
            Err(err) => {
                // No state change; the operator retries this sample
                eprintln!("{} {}", style("✗").red(), err);
            }
        }
    }

    Ok(())
}

fn prompt_scan(theme: &ColorfulTheme) -> Result<String> {
    Input::with_theme(theme)
        .with_prompt("Order number")
        .interact_text()
        .into_diagnostic()
}

fn collect_responses(
    session: &mut ControlSession,
    checklist: &[ChecklistItem],
    theme: &ColorfulTheme,
) -> Result<()> {
    for item in checklist {
        if let Some(guidance) = &item.guidance {
            println!("  {}", style(guidance).dim());
        }
        let value = match item.kind {
            ChecklistItemKind::PassFail => {
                let choice = Select::with_theme(theme)
                    .with_prompt(&item.label)
                    .items(&["pass", "fail"])
                    .default(0)
                    .interact()
                    .into_diagnostic()?;
                ResponseValue::PassFail(choice == 0)
            }
            ChecklistItemKind::Text => {
                let text: String = Input::with_theme(theme)
                    .with_prompt(&item.label)
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                ResponseValue::Text(text.trim().to_string())
            }
        };
        session
            .set_response(item.id.clone(), value)
            .into_diagnostic()?;
    }
    Ok(())
}
