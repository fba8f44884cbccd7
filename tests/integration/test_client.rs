//! REST client against a mock daemon.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use syncthing_shell::syncthing_client::{FolderStateCode, Options, RestApi, SyncthingClient};
use syncthing_shell::types::UiError;

use crate::common::{self, API_KEY, LOCAL_ID, REMOTE_ID};

#[tokio::test]
async fn test_config_reads_are_empty_until_loaded() {
    let (_server, client) = common::setup_syncthing_mock().await;

    assert!(!client.is_config_loaded());
    assert!(client.folders().is_none());
    assert!(client.devices(true).is_none());
    assert!(client.options().is_none());

    client.ping().await.expect("ping");
    client.load_config().await.expect("load config");
    assert!(client.is_config_loaded());
}

#[tokio::test]
async fn test_folders_sorted_and_local_device_hidden() {
    let (_server, client) = common::setup_syncthing_mock().await;
    client.load_config().await.expect("load config");

    let folders = client.folders().unwrap();
    let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);
    assert_eq!(folders[0].display_label(), "alpha");

    let remote_only = client.devices(false).unwrap();
    assert_eq!(remote_only.len(), 1);
    assert_eq!(remote_only[0].device_id, REMOTE_ID);

    let all = client.devices(true).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|d| d.device_id == LOCAL_ID));

    let options = client.options().unwrap();
    assert_eq!(options.ur_accepted, Options::USAGE_REPORTING_UNDECIDED);
    assert_eq!(
        client.gui().unwrap().url().as_deref(),
        Some("http://127.0.0.1:8384")
    );
}

#[tokio::test]
async fn test_folder_status_queries_by_id() {
    let (server, client) = common::setup_syncthing_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/db/status"))
        .and(query_param("folder", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "syncing",
            "globalBytes": 1000,
            "needBytes": 250,
            "inSyncBytes": 750
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.load_config().await.expect("load config");
    let alpha = client.folders().unwrap().remove(0);
    let status = client.folder_status(&alpha).await.expect("folder status");

    assert_eq!(status.state_code, FolderStateCode::Syncing);
    assert_eq!(status.completion, 75.0);
    assert_eq!(status.summary(), "Syncing (75%)");
}

#[tokio::test]
async fn test_connections_and_system_status() {
    let (server, client) = common::setup_syncthing_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/system/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connections": {
                REMOTE_ID: {
                    "connected": true,
                    "paused": false,
                    "address": "192.168.1.20:22000",
                    "clientVersion": "v1.27.0"
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/system/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "v1.27.0" })))
        .mount(&server)
        .await;

    let connections = client.connections().await.expect("connections");
    assert!(connections.connections[REMOTE_ID].connected);

    let overview = client.system_status().await.expect("system status");
    assert_eq!(overview.version.as_deref(), Some("v1.27.0"));
    assert_eq!(overview.short_id(), Some("LOCAL11"));
    assert_eq!(overview.uptime_label().as_deref(), Some("2h 1m"));
}

#[tokio::test]
async fn test_system_status_survives_missing_version() {
    let (_server, client) = common::setup_syncthing_mock().await;

    let overview = client.system_status().await.expect("system status");
    assert!(overview.version.is_none());
    assert_eq!(overview.goroutine_count, Some(42));
}

#[tokio::test]
async fn test_edit_settings_puts_both_sections_and_updates_cache() {
    let (server, client) = common::setup_syncthing_mock().await;
    Mock::given(method("PUT"))
        .and(path("/rest/config/gui"))
        .and(header("X-API-Key", API_KEY))
        .and(body_partial_json(json!({ "theme": "dark" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/rest/config/options"))
        .and(body_partial_json(json!({
            "urAccepted": 3,
            "globalAnnounceEnabled": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.load_config().await.expect("load config");
    let gui = client.gui().unwrap();
    let mut options = client.options().unwrap();
    options.ur_accepted = Options::USAGE_REPORTING_ACCEPTED;

    client
        .edit_settings(&gui, &options)
        .await
        .expect("edit settings");
    assert_eq!(
        client.options().unwrap().ur_accepted,
        Options::USAGE_REPORTING_ACCEPTED
    );
}

#[tokio::test]
async fn test_usage_report_is_pretty_printed() {
    let (server, client) = common::setup_syncthing_mock().await;
    Mock::given(method("GET"))
        .and(path("/rest/svc/report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "platform": "linux-arm",
            "numFolders": 2
        })))
        .mount(&server)
        .await;

    let report = client.usage_report().await.expect("usage report");
    assert!(report.contains("\n"));
    assert!(report.contains("\"platform\": \"linux-arm\""));
}

#[tokio::test]
async fn test_error_status_maps_to_syncthing_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/system/ping"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = SyncthingClient::with_base_url("wrong-key", server.uri()).unwrap();
    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, UiError::Syncthing(_)), "got {err:?}");
}
