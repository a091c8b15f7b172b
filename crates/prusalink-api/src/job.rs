// Print job endpoints
//
// Job state plus the three commands a running job accepts. Commands are
// addressed by job id; sending one for a job that no longer exists is an
// API error, not a special case.

use reqwest::Method;

use crate::client::PrusaLink;
use crate::error::Error;
use crate::types::JobInfo;

impl PrusaLink {
    /// Get the current print job, or `None` when nothing is printing.
    ///
    /// `GET /api/v1/job` (the printer answers `204 No Content` when idle)
    pub async fn get_job(&self) -> Result<Option<JobInfo>, Error> {
        self.get_optional("/api/v1/job").await
    }

    /// Pause a running job.
    ///
    /// `PUT /api/v1/job/{id}/pause`
    pub async fn pause_job(&self, id: u64) -> Result<(), Error> {
        self.send_command(Method::PUT, &format!("/api/v1/job/{id}/pause"))
            .await
    }

    /// Resume a paused job.
    ///
    /// `PUT /api/v1/job/{id}/resume`
    pub async fn resume_job(&self, id: u64) -> Result<(), Error> {
        self.send_command(Method::PUT, &format!("/api/v1/job/{id}/resume"))
            .await
    }

    /// Cancel a job.
    ///
    /// `DELETE /api/v1/job/{id}`
    pub async fn cancel_job(&self, id: u64) -> Result<(), Error> {
        self.send_command(Method::DELETE, &format!("/api/v1/job/{id}"))
            .await
    }
}
