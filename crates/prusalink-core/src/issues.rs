// ── Diagnostic issue registry ──
//
// Persistent, user-facing warnings -- as opposed to the transient
// "update failed" outcomes the coordinators emit. The host framework's
// own diagnostic surface implements `IssueRegistry`; the in-memory
// registry serves embedding hosts without one, and tests.

use std::collections::HashMap;

use dashmap::DashMap;

/// Domain under which this integration files its issues.
pub const DOMAIN: &str = "prusalink";

/// Issue id raised when the credential migration probe is rejected.
pub const FIRMWARE_ISSUE_ID: &str = "firmware_5_1_required";

/// Firmware update instructions for the MINI.
pub const MINI_FIRMWARE_UPDATE_URL: &str =
    "https://help.prusa3d.com/article/firmware-updating-mini-mini_124784";
/// Firmware update instructions for the MK4 and XL.
pub const MK4_XL_FIRMWARE_UPDATE_URL: &str =
    "https://help.prusa3d.com/article/how-to-update-firmware-mk4-xl_453086";

/// Severity of a diagnostic issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// A persistent diagnostic record directed at the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Domain the issue is filed under; issues are keyed by
    /// `(domain, id)` in hosts that aggregate several integrations.
    pub domain: &'static str,
    pub id: String,
    pub severity: IssueSeverity,
    /// Whether the host can offer an automated fix. The firmware issue
    /// cannot be fixed from here -- the user has to flash the printer.
    pub fixable: bool,
    /// Display parameters for the host's rendering of the issue.
    pub placeholders: HashMap<String, String>,
}

impl Issue {
    /// The issue raised when the migration probe fails with an auth
    /// error: the printer is still running pre-5.1 firmware that only
    /// understands API-key auth.
    pub fn firmware_upgrade_required(entry_title: &str) -> Self {
        let placeholders = HashMap::from([
            ("entry_title".to_owned(), entry_title.to_owned()),
            (
                "prusa_mini_firmware_update".to_owned(),
                MINI_FIRMWARE_UPDATE_URL.to_owned(),
            ),
            (
                "prusa_mk4_xl_firmware_update".to_owned(),
                MK4_XL_FIRMWARE_UPDATE_URL.to_owned(),
            ),
        ]);

        Self {
            domain: DOMAIN,
            id: FIRMWARE_ISSUE_ID.to_owned(),
            severity: IssueSeverity::Error,
            fixable: false,
            placeholders,
        }
    }
}

/// Where issues are raised and cleared.
pub trait IssueRegistry: Send + Sync {
    /// Raise an issue. Raising an id that is already present replaces
    /// the record, so repeated failures stay a single issue.
    fn raise(&self, issue: Issue);

    /// Clear an issue. Clearing an unknown id is a no-op.
    fn clear(&self, issue_id: &str);
}

/// In-memory issue registry keyed by issue id.
#[derive(Debug, Default)]
pub struct MemoryIssueRegistry {
    issues: DashMap<String, Issue>,
}

impl MemoryIssueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an issue by id.
    pub fn get(&self, issue_id: &str) -> Option<Issue> {
        self.issues.get(issue_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl IssueRegistry for MemoryIssueRegistry {
    fn raise(&self, issue: Issue) {
        self.issues.insert(issue.id.clone(), issue);
    }

    fn clear(&self, issue_id: &str) {
        self.issues.remove(issue_id);
    }
}
