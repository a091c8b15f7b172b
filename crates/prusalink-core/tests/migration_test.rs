// Migration tests against a wiremock printer.
//
// The probe call is real HTTP here; only the store and issue registry
// are the in-memory implementations.
#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prusalink_api::TransportConfig;
use prusalink_core::{
    ConfigEntry, CoreError, FIRMWARE_ISSUE_ID, Issue, IssueRegistry, IssueSeverity,
    MemoryEntryStore, MemoryIssueRegistry, migrate_to_version_2,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn v1_entry(host: &str) -> ConfigEntry {
    ConfigEntry {
        title: "workshop".into(),
        host: host.into(),
        version: 1,
        api_key: Some(SecretString::from("K".to_owned())),
        username: None,
        password: None,
    }
}

async fn mock_probe(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ── Success path ────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_migration_rewrites_and_persists() {
    let server = MockServer::start().await;

    // The probe must arrive with the new credentials, not the API key.
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "MK4" })))
        .mount(&server)
        .await;

    let store = MemoryEntryStore::new();
    let issues = MemoryIssueRegistry::new();

    let (migrated, _api) = migrate_to_version_2(
        &v1_entry(&server.uri()),
        &TransportConfig::default(),
        &store,
        &issues,
    )
    .await
    .unwrap();

    assert_eq!(migrated.version, 2);
    assert_eq!(migrated.username.as_deref(), Some("maker"));
    assert_eq!(migrated.password.unwrap().expose_secret(), "K");
    assert!(migrated.api_key.is_none());

    let persisted = store.get("workshop").unwrap();
    assert_eq!(persisted.version, 2);
    assert_eq!(persisted.username.as_deref(), Some("maker"));
    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_successful_migration_clears_stale_issue() {
    let server = MockServer::start().await;
    mock_probe(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "name": "MK4" })),
    )
    .await;

    let store = MemoryEntryStore::new();
    let issues = MemoryIssueRegistry::new();
    issues.raise(Issue::firmware_upgrade_required("workshop"));

    migrate_to_version_2(
        &v1_entry(&server.uri()),
        &TransportConfig::default(),
        &store,
        &issues,
    )
    .await
    .unwrap();

    assert!(issues.is_empty(), "earlier firmware issue must be cleared");
}

// ── Failure paths ───────────────────────────────────────────────────

#[tokio::test]
async fn test_auth_failure_raises_issue_and_persists_nothing() {
    let server = MockServer::start().await;
    mock_probe(&server, ResponseTemplate::new(401)).await;

    let store = MemoryEntryStore::new();
    let issues = MemoryIssueRegistry::new();
    let entry = v1_entry(&server.uri());

    let err = migrate_to_version_2(&entry, &TransportConfig::default(), &store, &issues)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(store.is_empty(), "nothing may be persisted on probe failure");

    let issue = issues.get(FIRMWARE_ISSUE_ID).unwrap();
    assert_eq!(issue.severity, IssueSeverity::Error);
    assert!(!issue.fixable);
    assert_eq!(
        issue.placeholders.get("entry_title").map(String::as_str),
        Some("workshop")
    );
    assert!(
        issue
            .placeholders
            .get("prusa_mini_firmware_update")
            .is_some()
    );
    assert!(
        issue
            .placeholders
            .get("prusa_mk4_xl_firmware_update")
            .is_some()
    );
}

#[tokio::test]
async fn test_repeated_auth_failures_raise_a_single_issue() {
    let server = MockServer::start().await;
    mock_probe(&server, ResponseTemplate::new(401)).await;

    let store = MemoryEntryStore::new();
    let issues = MemoryIssueRegistry::new();
    let entry = v1_entry(&server.uri());

    for _ in 0..3 {
        let _ = migrate_to_version_2(&entry, &TransportConfig::default(), &store, &issues).await;
    }

    assert_eq!(issues.len(), 1);
}

#[tokio::test]
async fn test_other_probe_errors_fail_without_issue() {
    let server = MockServer::start().await;
    mock_probe(&server, ResponseTemplate::new(500)).await;

    let store = MemoryEntryStore::new();
    let issues = MemoryIssueRegistry::new();

    let err = migrate_to_version_2(
        &v1_entry(&server.uri()),
        &TransportConfig::default(),
        &store,
        &issues,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::Api { .. }));
    assert!(issues.is_empty(), "only auth failures raise the issue");
    assert!(store.is_empty());
}
