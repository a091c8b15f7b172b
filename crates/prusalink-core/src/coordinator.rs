// ── Adaptive polling coordinators ──
//
// Each coordinator owns a single cached payload of one data type and
// refreshes it on a timer. Fetch failures become an observable "update
// failed" outcome, never a crash of the poll loop. The interval flips
// between two fixed values: fast while a change is expected (a command
// was just sent to the printer), slow otherwise.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use prusalink_api::{Error as ApiError, JobInfo, LegacyPrinterStatus, PrinterStatus, PrusaLink};

use crate::error::CoreError;

/// Hard bound on a single fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
/// Polling interval while a change is expected.
pub const FAST_INTERVAL: Duration = Duration::from_secs(5);
/// Steady-state polling interval.
pub const SLOW_INTERVAL: Duration = Duration::from_secs(30);
/// How long a call to [`Coordinator::expect_change`] keeps polling fast.
pub const EXPECT_CHANGE_WINDOW: Duration = Duration::from_secs(30);

// ── Poll targets ─────────────────────────────────────────────────────

/// One pollable data type: which client call to make and what it yields.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    /// The payload this target caches.
    type Payload: Clone + Send + Sync + 'static;

    /// Short name used in log lines.
    const NAME: &'static str;

    /// Fetch the payload from the printer.
    async fn fetch(&self, api: &PrusaLink) -> Result<Self::Payload, ApiError>;
}

/// Polls the full printer status (`GET /api/v1/status`).
#[derive(Debug)]
pub struct StatusTarget;

#[async_trait]
impl PollTarget for StatusTarget {
    type Payload = PrinterStatus;
    const NAME: &'static str = "status";

    async fn fetch(&self, api: &PrusaLink) -> Result<PrinterStatus, ApiError> {
        api.get_status().await
    }
}

/// Polls the legacy printer status (`GET /api/printer`).
#[derive(Debug)]
pub struct LegacyStatusTarget;

#[async_trait]
impl PollTarget for LegacyStatusTarget {
    type Payload = LegacyPrinterStatus;
    const NAME: &'static str = "legacy_status";

    async fn fetch(&self, api: &PrusaLink) -> Result<LegacyPrinterStatus, ApiError> {
        api.get_legacy_printer().await
    }
}

/// Polls the current job (`GET /api/v1/job`). The payload is `None`
/// while nothing is printing.
#[derive(Debug)]
pub struct JobTarget;

#[async_trait]
impl PollTarget for JobTarget {
    type Payload = Option<JobInfo>;
    const NAME: &'static str = "job";

    async fn fetch(&self, api: &PrusaLink) -> Result<Option<JobInfo>, ApiError> {
        api.get_job().await
    }
}

// ── Update outcome ───────────────────────────────────────────────────

/// Result of the most recent refresh, observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No refresh has completed yet.
    NotYetRun,
    /// The cached payload was replaced.
    Success { at: DateTime<Utc> },
    /// The fetch failed; the cached payload is unchanged.
    Failed { message: String },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Owns one cached payload and the schedule that keeps it fresh.
///
/// Shared behind an `Arc`: the poll loop refreshes it, consumers read
/// the cached value or subscribe to changes, and anyone who just sent
/// the printer a command can call [`expect_change`](Self::expect_change)
/// to speed the next polls up.
pub struct Coordinator<T: PollTarget> {
    api: Arc<PrusaLink>,
    target: T,
    data: watch::Sender<Option<Arc<T::Payload>>>,
    outcome: watch::Sender<UpdateOutcome>,
    interval: watch::Sender<Duration>,
    expect_change_until: watch::Sender<Option<Instant>>,
}

impl<T: PollTarget + std::fmt::Debug> std::fmt::Debug for Coordinator<T>
where
    T::Payload: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("api", &self.api)
            .field("target", &self.target)
            .field("data", &self.data)
            .field("outcome", &self.outcome)
            .field("interval", &self.interval)
            .field("expect_change_until", &self.expect_change_until)
            .finish()
    }
}

/// Coordinator for the full printer status.
pub type StatusCoordinator = Coordinator<StatusTarget>;
/// Coordinator for the legacy printer status.
pub type LegacyStatusCoordinator = Coordinator<LegacyStatusTarget>;
/// Coordinator for the current job.
pub type JobCoordinator = Coordinator<JobTarget>;

impl<T: PollTarget> Coordinator<T> {
    pub fn new(api: Arc<PrusaLink>, target: T) -> Self {
        let (data, _) = watch::channel(None);
        let (outcome, _) = watch::channel(UpdateOutcome::NotYetRun);
        let (interval, _) = watch::channel(SLOW_INTERVAL);
        let (expect_change_until, _) = watch::channel(None);

        Self {
            api,
            target,
            data,
            outcome,
            interval,
            expect_change_until,
        }
    }

    // ── Consumer surface ─────────────────────────────────────────────

    /// The latest successfully fetched payload, if any.
    pub fn data(&self) -> Option<Arc<T::Payload>> {
        self.data.borrow().clone()
    }

    /// Subscribe to data changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T::Payload>>> {
        self.data.subscribe()
    }

    /// Outcome of the most recent refresh.
    pub fn last_outcome(&self) -> UpdateOutcome {
        self.outcome.borrow().clone()
    }

    /// Subscribe to refresh outcomes (success and "update failed").
    pub fn subscribe_outcomes(&self) -> watch::Receiver<UpdateOutcome> {
        self.outcome.subscribe()
    }

    /// Current polling interval. Always [`FAST_INTERVAL`] or
    /// [`SLOW_INTERVAL`].
    pub fn poll_interval(&self) -> Duration {
        *self.interval.borrow()
    }

    /// Request faster polling for the next 30 seconds.
    ///
    /// Call after sending the printer a command whose effect the next
    /// poll should pick up quickly. Takes effect at the next interval
    /// recomputation, i.e. after the refresh currently in flight or the
    /// next one.
    pub fn expect_change(&self) {
        self.expect_change_until
            .send_replace(Some(Instant::now() + EXPECT_CHANGE_WINDOW));
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Run one fetch, bounded by [`FETCH_TIMEOUT`], and record the result.
    ///
    /// Failures are recorded as an outcome, never propagated; the cached
    /// payload only changes on success. The polling interval is
    /// recomputed after every attempt that reached the network layer.
    pub async fn refresh(&self) -> UpdateOutcome {
        let outcome = match tokio::time::timeout(FETCH_TIMEOUT, self.target.fetch(&self.api)).await
        {
            Ok(Ok(payload)) => {
                self.data.send_replace(Some(Arc::new(payload)));
                UpdateOutcome::Success { at: Utc::now() }
            }
            Ok(Err(err)) if err.is_auth() => UpdateOutcome::Failed {
                message: "Invalid authentication".into(),
            },
            Ok(Err(err)) => UpdateOutcome::Failed {
                message: err.to_string(),
            },
            Err(_elapsed) => UpdateOutcome::Failed {
                message: format!("Fetch timed out after {}s", FETCH_TIMEOUT.as_secs()),
            },
        };

        self.recompute_interval();
        self.outcome.send_replace(outcome.clone());
        outcome
    }

    /// The refresh that gates setup: a failure here is an error rather
    /// than a recorded outcome, so setup can abort.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        match self.refresh().await {
            UpdateOutcome::Failed { message } => Err(CoreError::NotReady { message }),
            _ => Ok(()),
        }
    }

    fn recompute_interval(&self) {
        let until = *self.expect_change_until.borrow();
        let expecting = until.is_some_and(|t| t > Instant::now());
        let next = if expecting { FAST_INTERVAL } else { SLOW_INTERVAL };
        self.interval.send_replace(next);
    }
}

// ── Poll loop ────────────────────────────────────────────────────────

/// Drive a coordinator until cancelled.
///
/// Sleeps the coordinator's current interval between refreshes; an
/// update failure is logged and polling continues on the next tick.
pub(crate) async fn poll_task<T: PollTarget>(
    coordinator: Arc<Coordinator<T>>,
    cancel: CancellationToken,
) {
    loop {
        let delay = coordinator.poll_interval();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {
                if let UpdateOutcome::Failed { message } = coordinator.refresh().await {
                    warn!(coordinator = T::NAME, error = %message, "update failed");
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
