//! Clap derive structures for the `prusalink` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// prusalink -- watch and control PrusaLink 3D printers
#[derive(Debug, Parser)]
#[command(
    name = "prusalink",
    version,
    about = "Watch and control PrusaLink 3D printers from the command line",
    long_about = "A small CLI over the PrusaLink local HTTP API.\n\n\
        Polls printer status, legacy telemetry, and job state on adaptive\n\
        intervals; entries created for pre-5.1 firmware are migrated to\n\
        username/password credentials on first use.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Printer entry from the config file
    #[arg(long, short = 'p', env = "PRUSALINK_PRINTER", global = true)]
    pub printer: Option<String>,

    /// Printer base URL (overrides the config file)
    #[arg(long, short = 'H', env = "PRUSALINK_HOST", global = true)]
    pub host: Option<String>,

    /// API key (pre-5.1 firmware)
    #[arg(long, env = "PRUSALINK_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Username (firmware >= 5.1 fixes this to "maker")
    #[arg(long, env = "PRUSALINK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (firmware >= 5.1)
    #[arg(long, env = "PRUSALINK_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PRUSALINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format for status/job
    #[arg(long, short = 'o', default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty-printed JSON
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current printer status
    Status,
    /// Show the current print job
    Job,
    /// Poll the printer and stream updates until interrupted
    Watch,
    /// Pause the running job
    Pause,
    /// Resume the paused job
    Resume,
    /// Cancel the current job
    Cancel,
}
