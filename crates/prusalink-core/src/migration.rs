// ── Credential migration, version 1 → 2 ──
//
// Firmware 5.1 replaced API-key auth with username/password auth, where
// the username is fixed by the firmware and the old API key doubles as
// the password. The rewrite is only persisted after a probe call
// confirms the printer accepts the new scheme; a printer that rejects
// it is still on old firmware, and that is the user's problem to fix,
// not something to retry.

use tracing::{debug, info};

use prusalink_api::{PrusaLink, TransportConfig};

use crate::entry::{CONFIG_VERSION, ConfigEntry};
use crate::error::CoreError;
use crate::issues::{FIRMWARE_ISSUE_ID, Issue, IssueRegistry};
use crate::store::EntryStore;

// "maker" is hardcoded in the firmware:
// https://github.com/prusa3d/Prusa-Firmware-Buddy/blob/master/lib/WUI/wui_api.h
const FIXED_USERNAME: &str = "maker";

/// Migrate a version 1 entry to version 2.
///
/// On success the rewritten entry has been persisted through `store`,
/// any earlier firmware issue is cleared, and the returned client is
/// already authenticated against the new scheme -- callers should reuse
/// it rather than probing again. On an auth failure nothing is
/// persisted, the firmware issue is raised, and the error aborts setup.
pub async fn migrate_to_version_2(
    entry: &ConfigEntry,
    transport: &TransportConfig,
    store: &dyn EntryStore,
    issues: &dyn IssueRegistry,
) -> Result<(ConfigEntry, PrusaLink), CoreError> {
    debug!(entry = %entry.title, "migrating config entry to version 2");

    let api_key = entry.api_key.clone().ok_or_else(|| CoreError::Config {
        message: "version 1 entry is missing an api_key".into(),
    })?;

    let mut migrated = entry.clone();
    migrated.username = Some(FIXED_USERNAME.to_owned());
    migrated.password = Some(api_key);
    migrated.api_key = None;
    migrated.version = CONFIG_VERSION;

    let api = migrated.build_api(transport)?;

    match api.get_info().await {
        Ok(_) => {}
        Err(err) if err.is_auth() => {
            // The new scheme was rejected, which usually means the
            // printer is still running a firmware older than 5.1.
            issues.raise(Issue::firmware_upgrade_required(&entry.title));
            return Err(CoreError::AuthenticationFailed {
                message: format!(
                    "printer '{}' rejected username/password auth; firmware 5.1 or newer is required",
                    entry.title
                ),
            });
        }
        Err(err) => return Err(err.into()),
    }

    store.update(&migrated)?;
    issues.clear(FIRMWARE_ISSUE_ID);
    info!(entry = %migrated.title, version = migrated.version, "migrated config entry");

    Ok((migrated, api))
}
