//! Command handlers: one-shot reads, the live watcher, and job commands.

use std::sync::Arc;

use tracing::debug;

use prusalink_api::types::{JobInfo, LegacyPrinterStatus, PrinterStatus};
use prusalink_core::issues::{MINI_FIRMWARE_UPDATE_URL, MK4_XL_FIRMWARE_UPDATE_URL};
use prusalink_core::{
    ConfigEntry, FIRMWARE_ISSUE_ID, HostServices, Integration, MemoryIssueRegistry, UpdateOutcome,
    setup,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a handler needs besides its own arguments.
pub struct CommandContext {
    pub entry: ConfigEntry,
    pub services: HostServices,
    /// The registry inside `services`, kept typed so handlers can read
    /// back what setup raised.
    pub issues: Arc<MemoryIssueRegistry>,
}

// ── Setup wrapper ────────────────────────────────────────────────────

/// Run core setup, translating a failed migration probe into the
/// firmware diagnostic the user can actually act on.
async fn setup_integration(ctx: &CommandContext) -> Result<Integration, CliError> {
    match setup(ctx.entry.clone(), &ctx.services).await {
        Ok(integration) => Ok(integration),
        Err(err) => {
            if ctx.issues.get(FIRMWARE_ISSUE_ID).is_some() {
                return Err(CliError::FirmwareUpgradeRequired {
                    entry: ctx.entry.title.clone(),
                    mini_url: MINI_FIRMWARE_UPDATE_URL,
                    mk4_url: MK4_XL_FIRMWARE_UPDATE_URL,
                });
            }
            Err(err.into())
        }
    }
}

// ── One-shot reads ───────────────────────────────────────────────────

pub async fn status(ctx: CommandContext, global: &GlobalOpts) -> Result<(), CliError> {
    let integration = setup_integration(&ctx).await?;
    let payload = integration.status().data();

    match (&global.output, payload) {
        (OutputFormat::Json, Some(status)) => {
            println!("{}", serde_json::to_string_pretty(status.as_ref())?);
        }
        (OutputFormat::Text, Some(status)) => println!("{}", format_status(&status)),
        (_, None) => println!("no status available"),
    }

    integration.unload().await;
    Ok(())
}

pub async fn job(ctx: CommandContext, global: &GlobalOpts) -> Result<(), CliError> {
    let integration = setup_integration(&ctx).await?;
    let payload = integration.job().data();

    match (&global.output, payload.as_deref()) {
        (OutputFormat::Json, Some(Some(job))) => {
            println!("{}", serde_json::to_string_pretty(job)?);
        }
        (OutputFormat::Text, Some(Some(job))) => println!("{}", format_job(job)),
        (_, _) => println!("no job running"),
    }

    integration.unload().await;
    Ok(())
}

// ── Watch ────────────────────────────────────────────────────────────

pub async fn watch(ctx: CommandContext, global: &GlobalOpts) -> Result<(), CliError> {
    let integration = setup_integration(&ctx).await?;

    // Print the initial snapshot; the watch receivers below only wake
    // up for values newer than their subscription point.
    if let Some(status) = integration.status().data() {
        println!("{}", format_status(&status));
    }
    if let Some(legacy) = integration.legacy_status().data() {
        println!("{}", format_legacy(&legacy));
    }
    if let Some(Some(job)) = integration.job().data().as_deref() {
        println!("{}", format_job(job));
    }

    let mut status_rx = integration.status().subscribe();
    let mut legacy_rx = integration.legacy_status().subscribe();
    let mut job_rx = integration.job().subscribe();
    let mut status_outcomes = integration.status().subscribe_outcomes();
    let mut legacy_outcomes = integration.legacy_status().subscribe_outcomes();
    let mut job_outcomes = integration.job().subscribe_outcomes();

    if !global.quiet {
        eprintln!("watching '{}' -- press Ctrl-C to stop", ctx.entry.title);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Ok(()) = status_rx.changed() => {
                if let Some(status) = status_rx.borrow_and_update().clone() {
                    println!("{}", format_status(&status));
                }
            }
            Ok(()) = legacy_rx.changed() => {
                if let Some(legacy) = legacy_rx.borrow_and_update().clone() {
                    println!("{}", format_legacy(&legacy));
                }
            }
            Ok(()) = job_rx.changed() => {
                match job_rx.borrow_and_update().as_deref() {
                    Some(Some(job)) => println!("{}", format_job(job)),
                    _ => println!("job: none"),
                }
            }
            Ok(()) = status_outcomes.changed() => report_failure("status", &status_outcomes.borrow_and_update()),
            Ok(()) = legacy_outcomes.changed() => report_failure("legacy", &legacy_outcomes.borrow_and_update()),
            Ok(()) = job_outcomes.changed() => report_failure("job", &job_outcomes.borrow_and_update()),
        }
    }

    integration.unload().await;
    Ok(())
}

fn report_failure(name: &str, outcome: &UpdateOutcome) {
    if let UpdateOutcome::Failed { message } = outcome {
        eprintln!("{name} update failed: {message}");
    }
}

// ── Job commands ─────────────────────────────────────────────────────

/// Which command to send to the running job.
#[derive(Debug, Clone, Copy)]
pub enum JobAction {
    Pause,
    Resume,
    Cancel,
}

pub async fn job_command(
    ctx: CommandContext,
    global: &GlobalOpts,
    action: JobAction,
) -> Result<(), CliError> {
    // One-shot commands talk to the client directly; there is no poll
    // loop alive in this process to speed up afterwards.
    let api = ctx.entry.build_api(&ctx.services.transport)?;

    let job = api.get_job().await?.ok_or(CliError::NoJob)?;
    debug!(job = job.id, ?action, "sending job command");

    let verb = match action {
        JobAction::Pause => {
            api.pause_job(job.id).await?;
            "paused"
        }
        JobAction::Resume => {
            api.resume_job(job.id).await?;
            "resumed"
        }
        JobAction::Cancel => {
            api.cancel_job(job.id).await?;
            "cancelled"
        }
    };

    if !global.quiet {
        eprintln!("job #{} {verb}", job.id);
    }
    Ok(())
}

// ── Text rendering ───────────────────────────────────────────────────

fn format_status(status: &PrinterStatus) -> String {
    let p = &status.printer;

    let nozzle = match (p.temp_nozzle, p.target_nozzle) {
        (Some(actual), Some(target)) => format!("  nozzle {actual:.1}/{target:.1}C"),
        (Some(actual), None) => format!("  nozzle {actual:.1}C"),
        _ => String::new(),
    };
    let bed = match (p.temp_bed, p.target_bed) {
        (Some(actual), Some(target)) => format!("  bed {actual:.1}/{target:.1}C"),
        (Some(actual), None) => format!("  bed {actual:.1}C"),
        _ => String::new(),
    };
    let progress = status
        .job
        .as_ref()
        .and_then(|j| j.progress)
        .map(|p| format!("  {p:.1}%"))
        .unwrap_or_default();

    format!("status: {}{nozzle}{bed}{progress}", p.state)
}

fn format_legacy(legacy: &LegacyPrinterStatus) -> String {
    let material = legacy
        .telemetry
        .material
        .as_deref()
        .map(|m| format!("  material {m}"))
        .unwrap_or_default();
    let z = legacy
        .telemetry
        .z_height
        .map(|z| format!("  z {z:.2}mm"))
        .unwrap_or_default();

    format!("telemetry: {}{material}{z}", legacy.state.text)
}

fn format_job(job: &JobInfo) -> String {
    let progress = job
        .progress
        .map(|p| format!("  {p:.1}%"))
        .unwrap_or_default();
    let remaining = job
        .time_remaining
        .map(|s| format!("  remaining {s}s"))
        .unwrap_or_default();
    let file = job
        .file
        .as_ref()
        .and_then(|f| f.display_name.clone().or_else(|| f.name.clone()))
        .map(|n| format!("  {n}"))
        .unwrap_or_default();

    format!("job: #{} {}{progress}{remaining}{file}", job.id, job.state)
}
