// Wire models for the PrusaLink API.
//
// Fields mirror the printer's JSON as closely as possible; anything the
// firmware omits on some models or in some states is an `Option`. The
// legacy endpoint predates the v1 API and uses kebab-case telemetry keys.

use serde::{Deserialize, Serialize};

// ── /api/v1/info ─────────────────────────────────────────────────────

/// Basic printer identification, `GET /api/v1/info`.
///
/// The core uses this only as the credential probe payload during
/// migration; the fields themselves are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterInfo {
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub location: Option<String>,
    pub serial: Option<String>,
    pub min_extrusion_temp: Option<f64>,
}

// ── /api/v1/status ───────────────────────────────────────────────────

/// Full printer status, `GET /api/v1/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterStatus {
    pub printer: StatusPrinter,
    #[serde(default)]
    pub job: Option<StatusJob>,
    #[serde(default)]
    pub storage: Option<StatusStorage>,
}

/// The `printer` block of the status payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPrinter {
    /// Printer state string, e.g. `IDLE`, `PRINTING`, `PAUSED`.
    pub state: String,
    pub temp_bed: Option<f64>,
    pub target_bed: Option<f64>,
    pub temp_nozzle: Option<f64>,
    pub target_nozzle: Option<f64>,
    pub axis_x: Option<f64>,
    pub axis_y: Option<f64>,
    pub axis_z: Option<f64>,
    pub flow: Option<f64>,
    pub speed: Option<f64>,
    pub fan_hotend: Option<f64>,
    pub fan_print: Option<f64>,
}

/// The `job` block of the status payload (absent when idle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusJob {
    pub id: u64,
    pub progress: Option<f64>,
    pub time_remaining: Option<i64>,
    pub time_printing: Option<i64>,
}

/// The `storage` block of the status payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusStorage {
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

// ── /api/v1/job ──────────────────────────────────────────────────────

/// Current print job, `GET /api/v1/job`.
///
/// The endpoint answers `204 No Content` when nothing is printing;
/// [`PrusaLink::get_job`](crate::PrusaLink::get_job) maps that to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: u64,
    /// Job state string, e.g. `PRINTING`, `PAUSED`.
    pub state: String,
    pub progress: Option<f64>,
    pub time_remaining: Option<i64>,
    pub time_printing: Option<i64>,
    #[serde(default)]
    pub file: Option<JobFile>,
}

/// File metadata attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub path: Option<String>,
    pub size: Option<u64>,
}

// ── /api/printer (legacy) ────────────────────────────────────────────

/// Legacy printer status, `GET /api/printer`.
///
/// Kept alongside the v1 status because some telemetry (material,
/// z-height) only appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPrinterStatus {
    pub telemetry: LegacyTelemetry,
    #[serde(default)]
    pub temperature: Option<LegacyTemperature>,
    pub state: LegacyState,
}

/// The legacy `telemetry` block. Keys are kebab-case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTelemetry {
    #[serde(rename = "temp-bed")]
    pub temp_bed: Option<f64>,
    #[serde(rename = "temp-nozzle")]
    pub temp_nozzle: Option<f64>,
    #[serde(rename = "print-speed")]
    pub print_speed: Option<f64>,
    #[serde(rename = "z-height")]
    pub z_height: Option<f64>,
    pub material: Option<String>,
}

/// The legacy `temperature` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTemperature {
    pub tool0: Option<LegacyTemperatureReading>,
    pub bed: Option<LegacyTemperatureReading>,
}

/// One actual/target temperature pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTemperatureReading {
    pub actual: Option<f64>,
    pub target: Option<f64>,
}

/// The legacy `state` block: display text plus boolean flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyState {
    pub text: String,
    pub flags: LegacyStateFlags,
}

/// Legacy state flags. The firmware sends more than these; unknown
/// flags are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyStateFlags {
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub printing: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub busy: bool,
}
