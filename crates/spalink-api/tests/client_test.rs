#![allow(clippy::unwrap_used)]
// Integration tests for `SpaClient` and `Transport` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spalink_api::{
    BlowerSelector, Error, Payload, PumpSelector, PumpState, SpaClient, Toggle, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

const KEY: &str = "test-key";

async fn setup_with(config: TransportConfig) -> (MockServer, SpaClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let key: secrecy::SecretString = KEY.to_string().into();
    let client = SpaClient::new(base_url, &key, &config).unwrap();
    (server, client)
}

async fn setup() -> (MockServer, SpaClient) {
    setup_with(TransportConfig::default()).await
}

// ── Headers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_every_request_carries_key_and_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("X-API-KEY", KEY))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "connected": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/boost"))
        .and(header("X-API-KEY", KEY))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.get_status().await.unwrap();
    client.boost().await.unwrap();
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true,
            "currentTempF": 99.0,
            "targetTempF": 102.0,
            "pump1": "high",
            "blower1": "off",
            "lights": "on",
            "ph": 7.4,
            "phStatus": "OK",
            "orp": 650,
            "orpStatus": "LOW"
        })))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();

    assert_eq!(status.connected, Some(true));
    assert_eq!(status.current_temp_f, Some(99.0));
    assert_eq!(status.target_temp_f, Some(102.0));
    assert_eq!(status.pump(1), Some("high"));
    assert_eq!(status.blower(1), Some("off"));
    assert_eq!(status.lights.as_deref(), Some("on"));
    assert_eq!(status.orp, Some(650.0));
    assert_eq!(status.orp_status.as_deref(), Some("LOW"));
    assert_eq!(status.probe_ph, None);
}

#[tokio::test]
async fn test_no_content_yields_empty_payload() {
    let (server, client) = setup().await;

    // A JSON content type with no body must still not be parsed.
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(204).insert_header("content-type", "application/json"))
        .mount(&server)
        .await;

    let payload = client
        .transport()
        .request(Method::GET, "/status", None)
        .await
        .unwrap();
    assert_eq!(payload, Payload::Empty);

    let result = client.get_status().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_success_returns_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let payload = client
        .transport()
        .request(Method::GET, "/status", None)
        .await
        .unwrap();
    assert_eq!(payload, Payload::Text("OK".into()));
}

#[tokio::test]
async fn test_mislabelled_json_is_returned_as_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&server)
        .await;

    let payload = client
        .transport()
        .request(Method::GET, "/status", None)
        .await
        .unwrap();
    assert_eq!(payload, Payload::Text("{not json".into()));

    // Status needs structure, so there the body is a deserialization error.
    match client.get_status().await {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "{not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_write_accepts_mislabelled_json_ack() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/boost"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("OK", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.boost().await.unwrap();
    assert_eq!(payload, Payload::Text("OK".into()));
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/temperature"))
        .respond_with(ResponseTemplate::new(422).set_body_string("setpoint out of range"))
        .mount(&server)
        .await;

    let err = client.set_temperature(130.0).await.unwrap_err();
    match err {
        Error::Api {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 422);
            assert_eq!(status_text, "Unprocessable Entity");
            assert_eq!(body, "setpoint out of range");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_distinct() {
    let (server, client) = setup_with(TransportConfig {
        timeout: Duration::from_millis(100),
        ..TransportConfig::default()
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(1000)),
        )
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_pump_puts_state() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/pumps/1"))
        .and(body_json(json!({ "state": "low" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client
        .set_pump(PumpSelector::One, PumpState::Low)
        .await
        .unwrap();
    assert!(payload.is_empty());
}

#[tokio::test]
async fn test_write_paths_and_bodies() {
    let (server, client) = setup().await;

    let expectations = [
        ("/temperature", json!({ "setpointF": 103.0 })),
        ("/lights", json!({ "state": "on" })),
        ("/pumps/all", json!({ "state": "off" })),
        ("/blowers/2", json!({ "state": "on" })),
        ("/fogger", json!({ "state": "off" })),
    ];
    for (p, body) in expectations {
        Mock::given(method("PUT"))
            .and(path(p))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.set_temperature(103.0).await.unwrap();
    client.set_lights(true).await.unwrap();
    client
        .set_pump(PumpSelector::All, PumpState::Off)
        .await
        .unwrap();
    client.set_blower(BlowerSelector::Two, true).await.unwrap();
    let payload = client.set_toggle(Toggle::Fogger, false).await.unwrap();

    // Plain-text acknowledgements are success, not a parse failure.
    assert_eq!(payload, Payload::Text("accepted".into()));
}
