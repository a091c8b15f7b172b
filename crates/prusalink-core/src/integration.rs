// ── Integration lifecycle ──
//
// Setup builds the shared client (migrating first if needed), runs the
// three coordinators through their first refresh one at a time, then
// spawns their poll loops. Unload cancels the loops and waits for them;
// nothing polls after it returns.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use prusalink_api::{PrusaLink, TransportConfig};

use crate::coordinator::{
    Coordinator, JobCoordinator, JobTarget, LegacyStatusCoordinator, LegacyStatusTarget,
    StatusCoordinator, StatusTarget, poll_task,
};
use crate::entry::ConfigEntry;
use crate::error::CoreError;
use crate::issues::IssueRegistry;
use crate::migration::migrate_to_version_2;
use crate::store::EntryStore;

/// Host collaborators injected into [`setup`].
pub struct HostServices {
    /// Persists entries the migration rewrites.
    pub store: Arc<dyn EntryStore>,
    /// Receives the firmware diagnostic issue.
    pub issues: Arc<dyn IssueRegistry>,
    /// Transport settings for the printer client.
    pub transport: TransportConfig,
}

/// A running printer integration: one shared client, three pollers.
#[derive(Debug)]
pub struct Integration {
    entry: ConfigEntry,
    api: Arc<PrusaLink>,
    status: Arc<StatusCoordinator>,
    legacy_status: Arc<LegacyStatusCoordinator>,
    job: Arc<JobCoordinator>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// Set up a printer integration from a stored config entry.
///
/// Version 1 entries are migrated first; the migration's probe client
/// is reused so the printer is not probed twice. First refreshes are
/// awaited sequentially, and a failure in any of them aborts setup --
/// only steady-state polls tolerate failure.
pub async fn setup(entry: ConfigEntry, services: &HostServices) -> Result<Integration, CoreError> {
    let (entry, api) = if entry.version == 1 {
        migrate_to_version_2(
            &entry,
            &services.transport,
            services.store.as_ref(),
            services.issues.as_ref(),
        )
        .await?
    } else {
        let api = entry.build_api(&services.transport)?;
        (entry, api)
    };

    let api = Arc::new(api);

    let status = Arc::new(Coordinator::new(Arc::clone(&api), StatusTarget));
    let legacy_status = Arc::new(Coordinator::new(Arc::clone(&api), LegacyStatusTarget));
    let job = Arc::new(Coordinator::new(Arc::clone(&api), JobTarget));

    status.first_refresh().await?;
    legacy_status.first_refresh().await?;
    job.first_refresh().await?;

    let cancel = CancellationToken::new();
    let tasks = vec![
        tokio::spawn(poll_task(Arc::clone(&status), cancel.child_token())),
        tokio::spawn(poll_task(Arc::clone(&legacy_status), cancel.child_token())),
        tokio::spawn(poll_task(Arc::clone(&job), cancel.child_token())),
    ];

    info!(entry = %entry.title, "printer integration ready");

    Ok(Integration {
        entry,
        api,
        status,
        legacy_status,
        job,
        cancel,
        tasks,
    })
}

impl Integration {
    /// The config entry this integration runs on (post-migration).
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// The shared printer client, e.g. for sending job commands.
    pub fn api(&self) -> &Arc<PrusaLink> {
        &self.api
    }

    /// Coordinator for the full printer status.
    pub fn status(&self) -> &Arc<StatusCoordinator> {
        &self.status
    }

    /// Coordinator for the legacy printer status.
    pub fn legacy_status(&self) -> &Arc<LegacyStatusCoordinator> {
        &self.legacy_status
    }

    /// Coordinator for the current job.
    pub fn job(&self) -> &Arc<JobCoordinator> {
        &self.job
    }

    /// Ask all three coordinators to poll faster for the next 30
    /// seconds. Call right after sending the printer a command.
    pub fn expect_change(&self) {
        self.status.expect_change();
        self.legacy_status.expect_change();
        self.job.expect_change();
    }

    /// Stop polling and wait for the poll loops to exit.
    pub async fn unload(self) {
        self.cancel.cancel();
        for task in self.tasks {
            let _ = task.await;
        }
        debug!(entry = %self.entry.title, "printer integration unloaded");
    }
}
