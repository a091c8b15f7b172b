// Printer status endpoints
//
// Read-only views of the printer itself: identification, the v1 status
// payload, and the legacy pre-v1 status kept around for telemetry the
// new endpoint doesn't carry.

use crate::client::PrusaLink;
use crate::error::Error;
use crate::types::{LegacyPrinterStatus, PrinterInfo, PrinterStatus};

impl PrusaLink {
    /// Get basic printer identification.
    ///
    /// `GET /api/v1/info`
    ///
    /// Lightweight; suitable as a credential probe.
    pub async fn get_info(&self) -> Result<PrinterInfo, Error> {
        self.get("/api/v1/info").await
    }

    /// Get the full printer status.
    ///
    /// `GET /api/v1/status`
    pub async fn get_status(&self) -> Result<PrinterStatus, Error> {
        self.get("/api/v1/status").await
    }

    /// Get the legacy printer status.
    ///
    /// `GET /api/printer`
    pub async fn get_legacy_printer(&self) -> Result<LegacyPrinterStatus, Error> {
        self.get("/api/printer").await
    }
}
