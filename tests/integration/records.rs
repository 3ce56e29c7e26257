//! Record round trips.

use super::common::client;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xata_rs::api::{
    DataInputValue, FileContent, FileSlot, InputFile, RecordWriteOptions, TransactionOperation,
    TransactionResult,
};
use xata_rs::{Address, RecordData};

fn alice() -> RecordData {
    let mut data = RecordData::new();
    data.insert("user-name".to_string(), "alice".into());
    data.insert("active".to_string(), true.into());
    data
}

#[tokio::test]
async fn test_insert_then_get_returns_only_user_columns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/docs:main/tables/users/data"))
        .and(body_json(json!({"user-name": "alice", "active": true})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "rec_abc",
            "xata": {"version": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/db/docs:main/tables/users/data/rec_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec_abc",
            "xata": {"version": 0, "createdAt": "2024-05-01T10:00:00Z"},
            "user-name": "alice",
            "active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let here = Address::new();

    let inserted = client
        .insert_record(&here, "users", &alice(), &[])
        .await
        .unwrap();
    assert_eq!(inserted.id, "rec_abc");

    let fetched = client
        .get_record(&here, "users", &inserted.id, &[])
        .await
        .unwrap();
    let mut keys: Vec<_> = fetched.data.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["active", "user-name"]);
    assert_eq!(fetched.xata.version, 0);
    assert!(fetched.xata.created_at.is_some());

    #[derive(Deserialize)]
    struct User {
        #[serde(rename = "user-name")]
        name: String,
        active: bool,
    }
    let user: User = fetched.decode().unwrap();
    assert_eq!(user.name, "alice");
    assert!(user.active);
}

#[tokio::test]
async fn test_get_with_columns_selects_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/docs:main/tables/users/data/rec_abc"))
        .and(query_param("columns", "user-name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec_abc",
            "xata": {"version": 0},
            "user-name": "alice"
        })))
        .mount(&server)
        .await;

    let fetched = client(&server)
        .get_record(&Address::new(), "users", "rec_abc", &["user-name"])
        .await
        .unwrap();
    assert_eq!(fetched.data.len(), 1);
    assert_eq!(fetched.get("user-name").unwrap(), "alice");
}

#[tokio::test]
async fn test_write_with_inline_file_and_download() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/db/docs:main/tables/users/data/alice"))
        .and(query_param("createOnly", "true"))
        .and(body_json(json!({
            "user-name": "alice",
            "avatar": {"name": "a.txt", "mediaType": "text/plain", "base64Content": "aGk="}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "alice",
            "xata": {"version": 0},
            "avatar": {"name": "a.txt", "mediaType": "text/plain", "size": 2, "version": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/db/docs:main/tables/users/data/alice/column/avatar/file"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"hi".to_vec(), "text/plain"))
        .mount(&server)
        .await;

    let client = client(&server);
    let here = Address::new();

    let mut data = RecordData::new();
    data.insert("user-name".to_string(), "alice".into());
    data.insert(
        "avatar".to_string(),
        InputFile::from_bytes("a.txt", "text/plain", b"hi").into(),
    );
    let record = client
        .insert_record_with_id(
            &here,
            "users",
            "alice",
            &data,
            &RecordWriteOptions::new().create_only(true),
        )
        .await
        .unwrap();
    assert_eq!(record.data["avatar"]["size"], 2);

    let FileContent { data, content_type } = client
        .get_file(&here, "users", "alice", "avatar", FileSlot::Single)
        .await
        .unwrap();
    assert_eq!(data.as_ref(), b"hi");
    assert_eq!(content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn test_transaction_on_another_branch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/db/docs:dev/transaction"))
        .and(body_json(json!({"operations": [
            {"insert": {"table": "users", "record": {"user-name": "alice", "active": true}}},
            {"update": {"table": "users", "id": "bob", "fields": {"active": false}}}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [
            {"operation": "insert", "id": "rec_1", "rows": 1},
            {"operation": "update", "id": "bob", "rows": 1}
        ]})))
        .mount(&server)
        .await;

    let mut update = RecordData::new();
    update.insert("active".to_string(), DataInputValue::Bool(false));
    let operations = [
        TransactionOperation::insert("users", alice()),
        TransactionOperation::update("users", "bob", update),
    ];

    let response = client(&server)
        .branch_transaction(&Address::new().with_branch("dev"), &operations)
        .await
        .unwrap();
    match &response.results[..] {
        [TransactionResult::Insert(insert), TransactionResult::Update(update)] => {
            assert_eq!(insert.id, "rec_1");
            assert_eq!(update.id, "bob");
        }
        other => panic!("unexpected results: {other:?}"),
    }
}
