//! Error mapping and call-level failures.

use std::time::Duration;

use super::common::client;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xata_rs::api::{ErrorMap, Identifier};
use xata_rs::{Address, ErrorKind, XataClient};

#[tokio::test]
async fn test_branch_not_found_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/docs:missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not_found", "message": "branch docs:missing not found"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_branch_details(&Address::new().with_branch("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound(_)));
    assert_eq!(err.api_body().unwrap().status, 404);
}

#[tokio::test]
async fn test_status_is_preserved_for_every_code() {
    let documented = ErrorMap::WRITE.documented();
    for status in [400u16, 401, 403, 404, 409, 422, 418, 500, 503] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/db/docs:main/tables/users/data"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "nope"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .insert_record(&Address::new(), "users", &Default::default(), &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(status), "status {status}");
        if documented.contains(&status) {
            assert_eq!(err.api_body().unwrap().status, status);
        } else {
            assert_eq!(err.raw_body(), Some(r#"{"message":"nope"}"#));
        }
    }
}

#[tokio::test]
async fn test_undocumented_status_keeps_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(418).set_body_string("I'm a teapot"))
        .mount(&server)
        .await;

    let err = client(&server).get_user().await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Api { status: 418, .. }));
    assert_eq!(err.raw_body(), Some("I'm a teapot"));
}

#[tokio::test]
async fn test_documented_status_with_foreign_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client(&server).get_user().await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ErrorBodyDecode { status: 401, .. }));
    assert_eq!(err.raw_body(), Some("<html>login</html>"));
}

#[tokio::test]
async fn test_missing_database_fails_before_sending() {
    let server = MockServer::start().await;
    let client = XataClient::builder()
        .api_key("xau_integration")
        .without_env_defaults()
        .workspace_id("ws-1")
        .data_plane_url(server.uri())
        .build()
        .unwrap();

    let err = client
        .get_record(&Address::new(), "users", "rec_1", &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::MissingIdentifier(Identifier::Database)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"workspaces": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = XataClient::builder()
        .api_key("xau_integration")
        .without_env_defaults()
        .control_plane_url(server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.list_workspaces().await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Timeout));
}
