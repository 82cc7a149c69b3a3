use anyhow::{Result, bail};
use console::style;
use dialoguer::{Confirm, FuzzySelect, Select};
use std::path::Path;
use std::time::Duration;
use triagedesk::backend::types::Ticket;
use triagedesk::error::SessionError;
use triagedesk::review::taxonomy::{STANDARD_INTENTS, STANDARD_ISSUES};
use triagedesk::review::{ExportOutcome, ReviewSession, SaveOutcome, SessionSnapshot, SubmitOutcome};

/// How long the save acknowledgment stays on screen. Presentation only; the
/// save and advance have already happened by the time this runs.
const SAVE_FLASH: Duration = Duration::from_millis(400);

/// Drive a full interactive review session: submit the dataset, walk the
/// flagged queue, export the collected decisions.
pub async fn run(session: &mut ReviewSession, file: &Path) -> Result<()> {
    session.select_file(file)?;

    println!(
        "  {} Submitting {}...",
        style("⏳").dim(),
        file.display()
    );

    match session.submit().await? {
        SubmitOutcome::EnteredReview { flagged } => {
            print_stats(session);
            println!(
                "  {} {} tickets need human review",
                style("🕵").bold(),
                style(flagged).yellow().bold()
            );
            println!();
        }
        SubmitOutcome::FullyAutomated => {
            print_stats(session);
            println!(
                "  {} All tickets automated! No human review needed.",
                style("✅").green().bold()
            );
            return Ok(());
        }
        SubmitOutcome::Failed { message } => bail!(message),
        SubmitOutcome::AlreadyRunning | SubmitOutcome::Stale => return Ok(()),
    }

    let mut review_done = false;
    while !review_done {
        let snapshot = session.snapshot();
        let Some(ticket) = snapshot.current_ticket.clone() else {
            break;
        };
        render_ticket(&ticket, &snapshot);

        let actions = [
            "Label & save",
            "Prefill from model suggestion",
            "Next ticket",
            "Previous ticket",
            "Export pending decisions",
            "Quit",
        ];
        let choice = Select::new()
            .with_prompt("  Action")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => review_done = label_and_save(session).await?,
            1 => {
                session.apply_suggestion()?;
                let form = session.form();
                println!(
                    "  {} staged: intent={} issue={}",
                    style("→").dim(),
                    form.intent,
                    form.issue
                );
            }
            2 => session.next_ticket()?,
            3 => session.prev_ticket()?,
            4 => export(session).await?,
            _ => break,
        }
    }

    if session.pending_decisions() > 0 {
        let export_now = Confirm::new()
            .with_prompt(format!(
                "  Export {} pending decision(s) now?",
                session.pending_decisions()
            ))
            .default(true)
            .interact()?;
        if export_now {
            export(session).await?;
        }
    }

    Ok(())
}

/// Prompt for both labels plus the safety flag, then save. Returns `true`
/// once the last ticket has been reviewed.
async fn label_and_save(session: &mut ReviewSession) -> Result<bool> {
    let staged = session.form().clone();

    let intent_default = STANDARD_INTENTS
        .iter()
        .position(|intent| *intent == staged.intent)
        .unwrap_or(0);
    let intent_idx = Select::new()
        .with_prompt("  Intent")
        .items(&STANDARD_INTENTS)
        .default(intent_default)
        .interact()?;

    let issue_default = STANDARD_ISSUES
        .iter()
        .position(|issue| *issue == staged.issue)
        .unwrap_or(0);
    let issue_idx = FuzzySelect::new()
        .with_prompt("  Issue")
        .items(&STANDARD_ISSUES)
        .default(issue_default)
        .interact()?;

    let safe = Confirm::new()
        .with_prompt("  Safe for automation?")
        .default(staged.safe)
        .interact()?;

    session.stage_form(STANDARD_INTENTS[intent_idx], STANDARD_ISSUES[issue_idx], safe)?;

    match session.save_current() {
        Ok(SaveOutcome::Advanced) => {
            println!("  {} Saved", style("✓").green().bold());
            tokio::time::sleep(SAVE_FLASH).await;
            Ok(false)
        }
        Ok(SaveOutcome::ReviewComplete) => {
            println!(
                "  {} Review complete! Export your decisions now.",
                style("🎉").bold()
            );
            Ok(true)
        }
        Err(SessionError::MissingLabels { .. }) => {
            println!(
                "  {} Select both an intent and an issue.",
                style("⚠").yellow().bold()
            );
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

async fn export(session: &mut ReviewSession) -> Result<()> {
    match session.export_decisions().await {
        ExportOutcome::Submitted { accepted } => {
            println!(
                "  {} Successfully submitted {accepted} label(s).",
                style("✅").green().bold()
            );
        }
        ExportOutcome::NothingPending => {
            println!("  {} Nothing to export yet.", style("→").dim());
        }
        ExportOutcome::Failed { message } => {
            println!(
                "  {} Export failed: {message} — decisions kept for retry.",
                style("❌").red().bold()
            );
        }
        ExportOutcome::AlreadyRunning | ExportOutcome::Stale => {}
    }
    Ok(())
}

fn render_ticket(ticket: &Ticket, snapshot: &SessionSnapshot) {
    println!();
    println!(
        "  {} {} {}",
        style(format!("Ticket {}/{}", snapshot.position + 1, snapshot.flagged))
            .white()
            .bold(),
        style(format!("(id {})", ticket.id)).dim(),
        match ticket.risk_score {
            Some(risk) => style(format!("risk {risk:.2}")).red().to_string(),
            None => String::new(),
        }
    );
    println!("  {}", ticket.text);

    match (&ticket.intent, &ticket.issue) {
        (Some(intent), Some(issue)) => {
            println!(
                "  {} model suggests: {intent} / {issue}",
                style("🤖").dim()
            );
        }
        _ => println!("  {} no model suggestion", style("🤖").dim()),
    }

    if !snapshot.form.intent.is_empty() || !snapshot.form.issue.is_empty() {
        println!(
            "  {} staged: {} / {} / safe={}",
            style("✎").dim(),
            snapshot.form.intent,
            snapshot.form.issue,
            snapshot.form.safe
        );
    }
    println!(
        "  {} {} decision(s) pending export",
        style("📦").dim(),
        snapshot.pending_decisions
    );
}

fn print_stats(session: &ReviewSession) {
    if let Some(stats) = session.stats() {
        println!(
            "  {} auto {}  human {}  coverage {:.1}%",
            style("📊").bold(),
            style(stats.auto).green(),
            style(stats.human).yellow(),
            stats.auto_coverage * 100.0
        );
    }
}
