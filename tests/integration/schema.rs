//! Branch and schema lifecycle.

use super::common::client;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xata_rs::api::{Column, ColumnType, CreateBranchRequest, MigrationOp};
use xata_rs::Address;

#[tokio::test]
async fn test_fork_branch_then_migrate() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/db/docs:feature"))
        .and(query_param("from", "main"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "databaseName": "docs", "branchName": "feature", "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/db/docs:feature/schema/apply"))
        .and(body_json(json!({"operations": [
            {"addTable": {"table": "posts"}},
            {"addColumn": {"table": "posts", "column": {"name": "attachments", "type": "file[]"}}}
        ]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "migrationID": "mig_1", "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/db/docs:feature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "databaseName": "docs",
            "branchName": "feature",
            "lastMigrationID": "mig_1",
            "startedFrom": {"branchName": "main", "dbBranchID": "bb_1", "migrationID": "mig_0"},
            "schema": {"tables": [{"name": "posts", "columns": [
                {"name": "attachments", "type": "file[]"}
            ]}]}
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let feature = Address::new().with_branch("feature");

    let request = CreateBranchRequest {
        from: Some("main".to_string()),
        metadata: None,
    };
    client.create_branch(&feature, &request).await.unwrap();

    let operations = [
        MigrationOp::add_table("posts"),
        MigrationOp::add_column("posts", Column::new("attachments", ColumnType::FileArray)),
    ];
    client.apply_migration(&feature, &operations).await.unwrap();

    let details = client.get_branch_details(&feature).await.unwrap();
    assert_eq!(details.last_migration_id.as_deref(), Some("mig_1"));
    assert_eq!(details.started_from.unwrap().branch_name, "main");
    assert_eq!(
        details.schema.tables[0].columns[0].column_type,
        ColumnType::FileArray
    );
}

#[tokio::test]
async fn test_workspace_and_database_setup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/ws-1/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "regions": [{"id": "eu-west-1"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/workspaces/ws-1/dbs/handbook"))
        .and(body_json(json!({"region": "eu-west-1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "databaseName": "handbook", "branchName": "main"
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let regions = client.list_regions(None).await.unwrap();
    let region = &regions.regions[0].id;

    let created = client
        .create_database(
            None,
            "handbook",
            &xata_rs::api::CreateDatabaseRequest::new(region.as_str()),
        )
        .await
        .unwrap();
    assert_eq!(created.database_name, "handbook");
}
