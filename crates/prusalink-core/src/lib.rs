// prusalink-core: polling coordinators, credential migration, and
// lifecycle for PrusaLink printers

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod integration;
pub mod issues;
pub mod migration;
pub mod store;

pub use coordinator::{
    Coordinator, EXPECT_CHANGE_WINDOW, FAST_INTERVAL, FETCH_TIMEOUT, JobCoordinator,
    LegacyStatusCoordinator, PollTarget, SLOW_INTERVAL, StatusCoordinator, UpdateOutcome,
};
pub use entry::{CONFIG_VERSION, ConfigEntry};
pub use error::CoreError;
pub use integration::{HostServices, Integration, setup};
pub use issues::{DOMAIN, FIRMWARE_ISSUE_ID, Issue, IssueRegistry, IssueSeverity, MemoryIssueRegistry};
pub use migration::migrate_to_version_2;
pub use store::{EntryStore, MemoryEntryStore};
