#[path = "../src/progress.rs"]
#[allow(dead_code)]
mod progress;

#[path = "../src/api_client.rs"]
#[allow(dead_code)]
mod api_client;

use api_client::ApiClient;
use atelier_core::{BatchPayload, Envelope, Error, MaterialItem, MaterialKind, Session};
use httpmock::Method::{GET, PATCH};
use httpmock::MockServer;
use serde_json::json;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Started { endpoint: String, total: usize },
    Progress { processed: usize, total: usize },
    ItemFailed { package: String, reason: String },
    Succeeded,
    Failed,
    AuthAdvisory { message: Option<String> },
    NoSitesAdvisory,
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<Event>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn auth_advisories(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::AuthAdvisory { .. }))
            .count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl progress::Reporter for RecordingReporter {
    fn sync_started(&self, endpoint: &str, total: usize) {
        self.push(Event::Started {
            endpoint: endpoint.to_string(),
            total,
        });
    }

    fn batch_uploaded(&self, processed: usize, total: usize) {
        self.push(Event::Progress { processed, total });
    }

    fn item_failed(&self, package: &str, reason: &str) {
        self.push(Event::ItemFailed {
            package: package.to_string(),
            reason: reason.to_string(),
        });
    }

    fn sync_succeeded(&self, _endpoint: &str) {
        self.push(Event::Succeeded);
    }

    fn sync_failed(&self) {
        self.push(Event::Failed);
    }

    fn auth_advisory(&self, _host: &str, remote_message: Option<&str>) {
        self.push(Event::AuthAdvisory {
            message: remote_message.map(str::to_string),
        });
    }

    fn no_sites_advisory(&self, _host: &str) {
        self.push(Event::NoSitesAdvisory);
    }
}

fn client_for(server: &MockServer) -> (ApiClient, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::default());
    let session = Session::new(server.base_url(), "secret-token").unwrap();
    let client = ApiClient::new(&session, Arc::clone(&reporter) as Arc<dyn progress::Reporter>);
    (client, reporter)
}

#[tokio::test]
async fn my_sites_sends_token_and_decodes_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/mysites")
            .header("x-auth-token", "secret-token");
        then.status(200).json_body(json!({
            "success": true,
            "data": [
                {"id": 7, "name": "design-lab"},
                {"id": 9, "name": "marketing"}
            ]
        }));
    });

    let (client, reporter) = client_for(&server);
    let envelope = client.my_sites().await.unwrap();

    mock.assert();
    match envelope {
        Envelope::Success { data: Some(sites) } => {
            assert_eq!(sites.len(), 2);
            assert_eq!(sites[0].id, 7);
            assert_eq!(sites[0].name, "design-lab");
        }
        other => panic!("unexpected envelope: {other:?}"),
    }
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn upload_sends_grouped_payload() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/v1/sites/7/materials")
            .header("x-auth-token", "secret-token")
            .json_body(json!({
                "blocks": ["block-hero@1.0.0"],
                "scaffolds": [],
                "components": ["comp-card@2.1.0"]
            }));
        then.status(200).json_body(json!({"success": true}));
    });

    let items = vec![
        MaterialItem {
            kind: MaterialKind::Block,
            package: "block-hero".to_string(),
            version: "1.0.0".to_string(),
        },
        MaterialItem {
            kind: MaterialKind::Component,
            package: "comp-card".to_string(),
            version: "2.1.0".to_string(),
        },
    ];
    let payload = BatchPayload::from_items(&items);

    let (client, _reporter) = client_for(&server);
    let endpoint = format!("{}/api/v1/sites/7/materials", server.base_url());
    let envelope = client.upload_materials(&endpoint, &payload).await.unwrap();

    mock.assert();
    assert_eq!(envelope, Envelope::Success { data: None });
}

#[tokio::test]
async fn unauthorized_emits_one_advisory_and_preserves_status() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/mysites");
        then.status(401)
            .json_body(json!({"success": false, "message": "token expired"}));
    });

    let (client, reporter) = client_for(&server);
    let err = client.my_sites().await.unwrap_err();

    mock.assert();
    match err {
        Error::AuthFailure { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("token expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(reporter.auth_advisories(), 1);
    assert_eq!(
        reporter.events(),
        vec![Event::AuthAdvisory {
            message: Some("token expired".to_string())
        }]
    );
}

#[tokio::test]
async fn forbidden_upload_is_auth_failure_without_remote_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path("/api/v1/sites/7/materials");
        then.status(403).body("forbidden");
    });

    let (client, reporter) = client_for(&server);
    let endpoint = format!("{}/api/v1/sites/7/materials", server.base_url());
    let err = client
        .upload_materials(&endpoint, &BatchPayload::default())
        .await
        .unwrap_err();

    match err {
        Error::AuthFailure { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, None);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(reporter.auth_advisories(), 1);
}

#[tokio::test]
async fn server_error_propagates_without_advisory() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/mysites");
        then.status(500).body("internal error");
    });

    let (client, reporter) = client_for(&server);
    let err = client.my_sites().await.unwrap_err();

    match err {
        Error::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(reporter.auth_advisories(), 0);
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    // Grab a free port, then close it so the connection is refused.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let reporter = Arc::new(RecordingReporter::default());
    let session = Session::new(format!("http://127.0.0.1:{port}"), "secret-token").unwrap();
    let client = ApiClient::new(&session, Arc::clone(&reporter) as Arc<dyn progress::Reporter>);

    let err = client.my_sites().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {err:?}");
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/mysites");
        then.status(200).body("not json");
    });

    let (client, _reporter) = client_for(&server);
    let err = client.my_sites().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}
