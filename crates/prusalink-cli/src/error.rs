//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text.

use miette::Diagnostic;
use thiserror::Error;

use prusalink_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No printer configured")]
    #[diagnostic(
        code(prusalink::no_config),
        help(
            "Add a [printers.<name>] entry to {path},\n\
             or pass --host together with --api-key (pre-5.1 firmware)\n\
             or --username/--password (firmware 5.1+)."
        )
    )]
    NoConfig { path: String },

    #[error("No printer named '{name}' in the config")]
    #[diagnostic(
        code(prusalink::unknown_printer),
        help("Check the [printers] entries in {path}.")
    )]
    UnknownPrinter { name: String, path: String },

    #[error("invalid {field}: {reason}")]
    #[diagnostic(code(prusalink::validation))]
    Validation { field: String, reason: String },

    // ── Firmware ─────────────────────────────────────────────────────
    #[error("Printer '{entry}' rejected username/password auth")]
    #[diagnostic(
        code(prusalink::firmware_upgrade_required),
        help(
            "The printer is running firmware older than 5.1 and was left on\n\
             API-key credentials. Update the firmware and retry:\n\
             MINI:   {mini_url}\n\
             MK4/XL: {mk4_url}"
        )
    )]
    FirmwareUpgradeRequired {
        entry: String,
        mini_url: &'static str,
        mk4_url: &'static str,
    },

    // ── Job commands ─────────────────────────────────────────────────
    #[error("No job is currently running")]
    #[diagnostic(code(prusalink::no_job))]
    NoJob,

    // ── Passthrough ──────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(prusalink::core))]
    Core(#[from] CoreError),

    #[error(transparent)]
    #[diagnostic(code(prusalink::api))]
    Api(#[from] prusalink_api::Error),

    #[error("failed to render output: {0}")]
    #[diagnostic(code(prusalink::output))]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::UnknownPrinter { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            Self::FirmwareUpgradeRequired { .. }
            | Self::Core(CoreError::AuthenticationFailed { .. })
            | Self::Api(prusalink_api::Error::InvalidAuth) => exit_code::AUTH,
            Self::Core(CoreError::ConnectionFailed { .. }) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}
