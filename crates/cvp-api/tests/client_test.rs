#![allow(clippy::unwrap_used)]
// Integration tests for `CvpClient` reads using wiremock.

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cvp_api::{AcceptPayload, CvpClient, Error, TlsMode, TransportConfig, client::paths};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CvpClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token: SecretString = "test-token".to_string().into();
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: std::time::Duration::from_secs(5),
    };
    let client = CvpClient::new(base_url, &token, &transport).unwrap();
    (server, client)
}

// ── Auth & headers ──────────────────────────────────────────────────

#[tokio::test]
async fn test_token_sent_as_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/resources/inventory/v1/Device/all"))
        .and(header("cookie", "access_token=test-token"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"device\":\"sw1\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.inventory().await;
    assert_eq!(devices.unwrap().len(), 1);
}

#[tokio::test]
async fn test_geo_json_accept_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/resources/event/v1/Event/all"))
        .and(header("accept", "application/geo+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let events = client
        .fetch_collection_as(paths::EVENTS, AcceptPayload::GeoJson)
        .await;
    assert_eq!(events.unwrap().len(), 1);
}

// ── NDJSON decoding on the read path ────────────────────────────────

#[tokio::test]
async fn test_malformed_lines_are_dropped_not_fatal() {
    let (server, client) = setup().await;

    let body = "{\"device\":\"sw1\"}\nthis is not json\n{\"device\":\"sw2\"}\n";
    Mock::given(method("GET"))
        .and(path("/api/resources/inventory/v1/Device/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let devices = client.inventory().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["device"], "sw1");
    assert_eq!(devices[1]["device"], "sw2");
}

#[tokio::test]
async fn test_204_no_content_is_an_empty_collection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/resources/connectivitymonitor/v1/ProbeStats/all"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let stats = client.connectivity_monitor().await;
    assert_eq!(stats, Some(Vec::new()));
}

// ── Failure policies ────────────────────────────────────────────────

#[tokio::test]
async fn test_non_2xx_is_an_api_error_on_the_raw_path() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/resources/event/v1/Event/all"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client
        .get_raw(paths::EVENTS, AcceptPayload::Json)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 500, ref message } if message.contains("internal error")),
        "expected Api error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_read_path_downgrades_api_failure_to_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/resources/event/v1/Event/all"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert_eq!(client.events().await, None);
}

#[tokio::test]
async fn test_read_path_downgrades_transport_failure_to_none() {
    // Nothing is listening on this port.
    let base_url = Url::parse("http://127.0.0.1:1/").unwrap();
    let token: SecretString = "t".to_string().into();
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: std::time::Duration::from_secs(1),
    };
    let client = CvpClient::new(base_url, &token, &transport).unwrap();

    assert_eq!(client.inventory().await, None);
}

#[tokio::test]
async fn test_write_path_surfaces_transport_failure() {
    let base_url = Url::parse("http://127.0.0.1:1/").unwrap();
    let token: SecretString = "t".to_string().into();
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: std::time::Duration::from_secs(1),
    };
    let client = CvpClient::new(base_url, &token, &transport).unwrap();

    let err = client
        .post_json(paths::TAG_CONFIG, &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(err.is_transport(), "expected transport error, got: {err:?}");
}
