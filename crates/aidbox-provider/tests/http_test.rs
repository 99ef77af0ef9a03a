//! Integration tests for the HTTP transport using wiremock.
//!
//! Covers the token exchange, bearer and basic authentication, status mapping for each
//! operation, and timeouts.

use aidbox_provider::config::{AuthMode, ProviderConfig};
use aidbox_provider::http::AidboxClient;
use aidbox_provider::lifecycle::AidboxProvider;
use aidbox_provider::model::UserSpec;
use reconcile_framework::{DeclaredState, Document, Transport, TransportError};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{basic_auth, bearer_token, body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

fn token_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(server.uri(), "root", "secret")
}

fn basic_config(server: &MockServer) -> ProviderConfig {
    token_config(server).with_auth_mode(AuthMode::Basic)
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(basic_auth("root", "secret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// =============================================================================
// Token Exchange
// =============================================================================

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-123").await;

    Mock::given(method("GET"))
        .and(path("/User/ada"))
        .and(bearer_token("tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "User",
            "id": "ada"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&token_config(&server)).await.unwrap();
    assert!(client.read("User", "ada").await.unwrap().is_some());
    assert!(client.read("User", "ada").await.unwrap().is_some());
}

#[tokio::test]
async fn test_rejected_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
        .mount(&server)
        .await;

    let err = AidboxClient::connect(&token_config(&server)).await.unwrap_err();
    match err {
        TransportError::Token(msg) => {
            assert!(msg.contains("401"));
            assert!(!msg.contains("secret"));
        }
        other => panic!("expected token error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_access_token() {
    let server = MockServer::start().await;
    mount_token(&server, "").await;

    let err = AidboxClient::connect(&token_config(&server)).await.unwrap_err();
    assert!(matches!(err, TransportError::Token(_)));
}

#[tokio::test]
async fn test_provider_connect_fails_on_token_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(AidboxProvider::connect(&token_config(&server)).await.is_err());
}

// =============================================================================
// Resource Operations
// =============================================================================

#[tokio::test]
async fn test_put_sends_document_with_basic_auth() {
    let server = MockServer::start().await;
    let document = doc(json!({"resourceType": "Role", "id": "r1", "name": "admin"}));

    Mock::given(method("PUT"))
        .and(path("/Role/r1"))
        .and(basic_auth("root", "secret"))
        .and(body_json(&document))
        .respond_with(ResponseTemplate::new(201).set_body_json(&document))
        .expect(1)
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    client.create_or_replace("Role", "r1", &document).await.unwrap();
}

#[tokio::test]
async fn test_id_stays_in_one_path_segment() {
    let server = MockServer::start().await;
    let document = doc(json!({"resourceType": "User", "id": "a/$sql?x=1"}));

    Mock::given(method("PUT"))
        .and(path("/User/a%2F$sql%3Fx=1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    client
        .create_or_replace("User", "a/$sql?x=1", &document)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[0].url.path_segments().unwrap().count(), 2);
}

#[tokio::test]
async fn test_read_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/User/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "resourceType": "OperationOutcome"
        })))
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    assert!(client.read("User", "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_non_object_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/User/odd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    assert!(matches!(
        client.read("User", "odd").await,
        Err(TransportError::Body(_))
    ));
}

#[tokio::test]
async fn test_delete_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/User/u1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/User/u2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    client.delete("User", "u1").await.unwrap();

    let err = client.delete("User", "u2").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/User/bad"))
        .respond_with(ResponseTemplate::new(422).set_body_string("name is required"))
        .mount(&server)
        .await;

    let client = AidboxClient::connect(&basic_config(&server)).await.unwrap();
    let err = client
        .create_or_replace("User", "bad", &doc(json!({"resourceType": "User", "id": "bad"})))
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "name is required");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/User/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = basic_config(&server).with_timeout(Duration::from_millis(200));
    let client = AidboxClient::connect(&config).await.unwrap();
    assert!(matches!(
        client.read("User", "slow").await,
        Err(TransportError::Timeout(_))
    ));
}

// =============================================================================
// End-to-End Over HTTP
// =============================================================================

#[tokio::test]
async fn test_user_create_round_trip() {
    let server = MockServer::start().await;
    mount_token(&server, "tok").await;

    Mock::given(method("PUT"))
        .and(path("/User/ada"))
        .and(bearer_token("tok"))
        .and(body_json(json!({
            "resourceType": "User",
            "id": "ada",
            "name": {"givenName": "Ada", "familyName": "Lovelace"},
            "password": "p@ss"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/User/ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "User",
            "id": "ada",
            "name": {"givenName": "Ada", "familyName": "Lovelace"},
            "password": "$s0$f00d",
            "meta": {"versionId": "7", "lastUpdated": "2024-01-01T00:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = AidboxProvider::connect(&token_config(&server)).await.unwrap();
    let state = DeclaredState::new(UserSpec::new("Ada", "Lovelace").with_password("p@ss"));
    let (identity, observed) = provider.users.create_user(Some("ada"), state).await.unwrap();

    assert_eq!(identity.to_string(), "User/ada");
    assert_eq!(observed.known, UserSpec::new("Ada", "Lovelace"));
    assert!(observed.extensions.is_empty());
    assert_eq!(observed.meta.unwrap().version_id.as_deref(), Some("7"));
}
