mod cli;
mod commands;
mod error;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use prusalink_api::TransportConfig;
use prusalink_core::{ConfigEntry, HostServices, MemoryEntryStore, MemoryIssueRegistry};
use prusalink_config::FileEntryStore;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::{CommandContext, JobAction};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = build_context(&cli.global)?;

    match cli.command {
        Command::Status => commands::status(ctx, &cli.global).await,
        Command::Job => commands::job(ctx, &cli.global).await,
        Command::Watch => commands::watch(ctx, &cli.global).await,
        Command::Pause => commands::job_command(ctx, &cli.global, JobAction::Pause).await,
        Command::Resume => commands::job_command(ctx, &cli.global, JobAction::Resume).await,
        Command::Cancel => commands::job_command(ctx, &cli.global, JobAction::Cancel).await,
    }
}

/// Assemble the entry and host services from the config file and CLI
/// flag overrides.
fn build_context(global: &GlobalOpts) -> Result<CommandContext, CliError> {
    let (entry, from_file) = build_entry(global)?;

    let transport = global
        .timeout
        .map_or_else(TransportConfig::default, |secs| {
            TransportConfig::with_timeout(Duration::from_secs(secs))
        });

    // Flags-only entries are not persisted back: a migration triggered
    // by an ad-hoc `--host/--api-key` invocation shouldn't write config
    // the user never created.
    let store: Arc<dyn prusalink_core::EntryStore> = if from_file {
        Arc::new(FileEntryStore::canonical())
    } else {
        Arc::new(MemoryEntryStore::new())
    };

    let issues = Arc::new(MemoryIssueRegistry::new());
    let services = HostServices {
        store,
        issues: Arc::clone(&issues) as Arc<dyn prusalink_core::IssueRegistry>,
        transport,
    };

    Ok(CommandContext {
        entry,
        services,
        issues,
    })
}

/// Build a `ConfigEntry` from the config file, printer name, and CLI
/// overrides. Returns whether the entry came from the config file.
fn build_entry(global: &GlobalOpts) -> Result<(ConfigEntry, bool), CliError> {
    // A --host flag bypasses the config file entirely.
    if let Some(ref host) = global.host {
        return Ok((entry_from_flags(host, global)?, false));
    }

    let cfg = prusalink_config::load_config_or_default();
    let path = prusalink_config::config_path().display().to_string();

    let name = match global.printer.clone().or_else(|| {
        cfg.default_printer
            .clone()
            .or_else(|| single_printer_name(&cfg))
    }) {
        Some(name) => name,
        None => return Err(CliError::NoConfig { path }),
    };

    let stored = cfg
        .printers
        .get(&name)
        .ok_or_else(|| CliError::UnknownPrinter {
            name: name.clone(),
            path,
        })?;

    let mut entry =
        prusalink_config::to_core_entry(&name, stored).map_err(|e| CliError::Validation {
            field: "printers".into(),
            reason: e.to_string(),
        })?;

    // Credential flags override the stored entry.
    if let Some(ref key) = global.api_key {
        entry.api_key = Some(SecretString::from(key.clone()));
    }
    if let Some(ref username) = global.username {
        entry.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        entry.password = Some(SecretString::from(password.clone()));
    }

    Ok((entry, true))
}

/// When the config has exactly one printer, use it without flags.
fn single_printer_name(cfg: &prusalink_config::Config) -> Option<String> {
    let mut names = cfg.printers.keys();
    match (names.next(), names.next()) {
        (Some(name), None) => Some(name.clone()),
        _ => None,
    }
}

/// Build an entry purely from `--host` + credential flags.
fn entry_from_flags(host: &str, global: &GlobalOpts) -> Result<ConfigEntry, CliError> {
    let title = global.printer.clone().unwrap_or_else(|| "printer".into());

    // username/password wins when both credential styles are given;
    // an API key alone means a version 1 entry that will be migrated.
    let (version, api_key, username, password) =
        match (&global.username, &global.password, &global.api_key) {
            (Some(username), Some(password), _) => (
                2,
                None,
                Some(username.clone()),
                Some(SecretString::from(password.clone())),
            ),
            (None, None, Some(key)) => (1, Some(SecretString::from(key.clone())), None, None),
            _ => {
                return Err(CliError::Validation {
                    field: "credentials".into(),
                    reason: "pass --api-key, or both --username and --password".into(),
                });
            }
        };

    Ok(ConfigEntry {
        title,
        host: host.to_owned(),
        version,
        api_key,
        username,
        password,
    })
}
