//! Mock hosted-store tests for the HTTP backend.
//!
//! These tests use wiremock to simulate the hosted document store and
//! exercise the client without network access or real credentials.

use salon_core::documents::SortSpec;
use salon_core::error::{AdapterError, AuthError};
use salon_core::types::{Collection, Credentials, Fields, RecordId};
use salon_core::{Error, Session, Store};
use salon_http::HttpBackend;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a store URL from a mock server.
fn mock_store_url(server: &MockServer) -> salon_core::StoreUrl {
    // For tests, HTTP localhost is allowed.
    salon_core::StoreUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

async fn signed_in_session(server: &MockServer) -> salon_http::HttpSession {
    Mock::given(method("POST"))
        .and(path("/v1/auth/signIn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "u-admin",
            "accessToken": "token-123",
        })))
        .mount(server)
        .await;

    let backend = HttpBackend::new(mock_store_url(server));
    backend
        .sign_in(Credentials::new("admin@salon.example", "pw"))
        .await
        .unwrap()
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn sign_in_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/signIn"))
        .and(body_json(json!({
            "identifier": "admin@salon.example",
            "password": "secret123",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "u-admin",
            "accessToken": "token-123",
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(mock_store_url(&server));
    let session = backend
        .sign_in(Credentials::new("admin@salon.example", "secret123"))
        .await
        .unwrap();

    assert_eq!(session.uid().as_str(), "u-admin");
}

#[tokio::test]
async fn sign_in_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/signIn"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "InvalidCredentials",
            "message": "Invalid identifier or password",
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(mock_store_url(&server));
    let result = backend
        .sign_in(Credentials::new("bad@user", "wrongpass"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::InvalidCredentials(_)))
    ));
}

#[tokio::test]
async fn sign_up_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/signUp"))
        .and(body_json(json!({
            "handle": "new@salon.example",
            "password": "pw",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "u-new",
            "handle": "new@salon.example",
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(mock_store_url(&server));
    let output = backend
        .sign_up("new@salon.example", "pw", None)
        .await
        .unwrap();

    assert_eq!(output.uid.as_str(), "u-new");
    assert_eq!(output.handle, "new@salon.example");
}

// ============================================================================
// Record CRUD
// ============================================================================

#[tokio::test]
async fn anonymous_list_is_ordered_by_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/services"))
        .and(query_param("orderBy", "name"))
        .and(query_param("direction", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "svc1", "fields": {"name": "Balayage", "price": 120.0}},
                {"id": "svc2", "fields": {"name": "Cut", "price": 30.0}},
            ],
        })))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(mock_store_url(&server));
    let records = backend
        .list(&Collection::new("services").unwrap(), &SortSpec::asc("name"))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_str(), "svc1");
    assert_eq!(
        records[1].fields.get("name").and_then(|v| v.as_str()),
        Some("Cut")
    );
}

#[tokio::test]
async fn create_posts_fields_with_bearer_token() {
    let server = MockServer::start().await;
    let session = signed_in_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/collections/services"))
        .and(header("authorization", "Bearer token-123"))
        .and(body_json(json!({
            "name": "Cut",
            "description": "Classic cut with wash",
            "price": 30.0,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "svc-new"})))
        .mount(&server)
        .await;

    let id = session
        .create(
            &Collection::new("services").unwrap(),
            Fields::new(json!({
                "name": "Cut",
                "description": "Classic cut with wash",
                "price": 30.0,
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(id.as_str(), "svc-new");
}

#[tokio::test]
async fn merge_update_patches_with_merge_flag() {
    let server = MockServer::start().await;
    let session = signed_in_session(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/v1/collections/services/svc1"))
        .and(query_param("merge", "true"))
        .and(body_json(json!({"price": 35.0})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    session
        .update(
            &Collection::new("services").unwrap(),
            &RecordId::new("svc1").unwrap(),
            Fields::new(json!({"price": 35.0})).unwrap(),
            true,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_maps_permission_denied() {
    let server = MockServer::start().await;
    let session = signed_in_session(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/collections/services/svc1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": "PermissionDenied",
            "message": "admin role required",
        })))
        .mount(&server)
        .await;

    let result = session
        .delete(
            &Collection::new("services").unwrap(),
            &RecordId::new("svc1").unwrap(),
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::Adapter(AdapterError::PermissionDenied { .. }))
    ));
}

#[tokio::test]
async fn get_maps_not_found() {
    let server = MockServer::start().await;
    let session = signed_in_session(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/collections/services/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "NotFound",
            "message": "services/missing",
        })))
        .mount(&server)
        .await;

    let result = session
        .get(
            &Collection::new("services").unwrap(),
            &RecordId::new("missing").unwrap(),
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::Adapter(AdapterError::NotFound { .. }))
    ));
}

// ============================================================================
// Object uploads
// ============================================================================

#[tokio::test]
async fn upload_streams_body_and_returns_download_url() {
    use salon_core::ObjectStore;
    use std::sync::{Arc, Mutex};

    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/objects/blog/cover.jpg"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloadURL": "https://cdn.example.com/blog/cover.jpg",
        })))
        .mount(&server)
        .await;

    let objects = salon_http::HttpObjects::new(
        mock_store_url(&server),
        salon_core::AccessToken::new("token-123"),
    );

    let seen = Arc::new(Mutex::new(Vec::<f32>::new()));
    let seen_cb = seen.clone();
    let url = objects
        .upload(
            "blog/cover.jpg",
            &vec![9u8; 150_000],
            Some(Box::new(move |p| seen_cb.lock().unwrap().push(p))),
        )
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example.com/blog/cover.jpg");
    let seen = seen.lock().unwrap();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*seen.last().unwrap(), 100.0);
}
