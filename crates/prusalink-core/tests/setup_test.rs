// End-to-end setup/unload tests against a wiremock printer.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prusalink_api::TransportConfig;
use prusalink_core::{
    ConfigEntry, CoreError, FAST_INTERVAL, FIRMWARE_ISSUE_ID, HostServices, MemoryEntryStore,
    MemoryIssueRegistry, setup,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn status_body() -> serde_json::Value {
    json!({
        "printer": {
            "state": "IDLE",
            "temp_bed": 24.1,
            "target_bed": 0.0,
            "temp_nozzle": 26.0,
            "target_nozzle": 0.0
        }
    })
}

fn legacy_body() -> serde_json::Value {
    json!({
        "telemetry": {
            "temp-bed": 24.1,
            "temp-nozzle": 26.0,
            "material": "PLA"
        },
        "state": {
            "text": "Operational",
            "flags": { "operational": true, "ready": true }
        }
    })
}

/// Mount the full happy-path printer: probe, status, legacy, idle job.
async fn mock_printer(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "MK4" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/printer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/job"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

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

fn v2_entry(host: &str) -> ConfigEntry {
    ConfigEntry {
        title: "workshop".into(),
        host: host.into(),
        version: 2,
        api_key: None,
        username: Some("maker".into()),
        password: Some(SecretString::from("K".to_owned())),
    }
}

struct Host {
    store: Arc<MemoryEntryStore>,
    issues: Arc<MemoryIssueRegistry>,
    services: HostServices,
}

fn host() -> Host {
    let store = Arc::new(MemoryEntryStore::new());
    let issues = Arc::new(MemoryIssueRegistry::new());
    let services = HostServices {
        store: Arc::clone(&store) as Arc<dyn prusalink_core::EntryStore>,
        issues: Arc::clone(&issues) as Arc<dyn prusalink_core::IssueRegistry>,
        transport: TransportConfig::default(),
    };
    Host {
        store,
        issues,
        services,
    }
}

// ── Setup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_setup_v1_entry_migrates_and_populates_coordinators() {
    let server = MockServer::start().await;
    mock_printer(&server).await;
    let host = host();

    let integration = setup(v1_entry(&server.uri()), &host.services).await.unwrap();

    // Migration persisted the rewrite and the integration runs on it.
    assert_eq!(integration.entry().version, 2);
    assert_eq!(host.store.get("workshop").unwrap().version, 2);
    assert!(host.issues.is_empty());

    // All three first refreshes completed.
    let status = integration.status().data().unwrap();
    assert_eq!(status.printer.state, "IDLE");

    let legacy = integration.legacy_status().data().unwrap();
    assert_eq!(legacy.telemetry.material.as_deref(), Some("PLA"));

    let job = integration.job().data().unwrap();
    assert!(job.is_none(), "idle printer has no job");

    integration.unload().await;
}

#[tokio::test]
async fn test_setup_v2_entry_skips_migration() {
    let server = MockServer::start().await;
    mock_printer(&server).await;
    let host = host();

    let integration = setup(v2_entry(&server.uri()), &host.services).await.unwrap();

    // No migration ran, so nothing was persisted.
    assert!(host.store.is_empty());
    assert!(integration.status().data().is_some());

    integration.unload().await;
}

#[tokio::test]
async fn test_setup_fails_when_migration_probe_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let host = host();

    let err = setup(v1_entry(&server.uri()), &host.services)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(host.store.is_empty());
    assert!(host.issues.get(FIRMWARE_ISSUE_ID).is_some());
}

#[tokio::test]
async fn test_setup_fails_when_first_refresh_fails() {
    let server = MockServer::start().await;
    // Probe succeeds, but the status endpoint is broken.
    Mock::given(method("GET"))
        .and(path("/api/v1/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "MK4" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let host = host();

    let err = setup(v1_entry(&server.uri()), &host.services)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::NotReady { .. }));
}

#[tokio::test]
async fn test_expect_change_speeds_up_all_coordinators() {
    let server = MockServer::start().await;
    mock_printer(&server).await;
    let host = host();

    let integration = setup(v2_entry(&server.uri()), &host.services).await.unwrap();

    integration.expect_change();

    // The shorter interval shows up at the next recomputation, i.e.
    // after the next refresh on each coordinator.
    integration.status().refresh().await;
    integration.legacy_status().refresh().await;
    integration.job().refresh().await;

    assert_eq!(integration.status().poll_interval(), FAST_INTERVAL);
    assert_eq!(integration.legacy_status().poll_interval(), FAST_INTERVAL);
    assert_eq!(integration.job().poll_interval(), FAST_INTERVAL);

    integration.unload().await;
}

// ── Unload ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unload_stops_polling() {
    let server = MockServer::start().await;
    mock_printer(&server).await;
    let host = host();

    let integration = setup(v2_entry(&server.uri()), &host.services).await.unwrap();
    let requests_before = server.received_requests().await.unwrap().len();

    integration.unload().await;

    // Give any straggler task a moment, then confirm nothing new hit
    // the printer. The poll intervals are far longer than this window,
    // so any request here would mean a loop survived unload.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let requests_after = server.received_requests().await.unwrap().len();
    assert_eq!(requests_before, requests_after);
}
