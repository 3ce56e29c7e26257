//! Database and branch types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::table::Schema;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseUi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseMetadata {
    pub name: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub new_migrations: Option<bool>,
    #[serde(default)]
    pub ui: Option<DatabaseUi>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseList {
    #[serde(default)]
    pub databases: Vec<DatabaseMetadata>,
}

/// Body of database creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<DatabaseUi>,
}

impl CreateDatabaseRequest {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            branch_name: None,
            ui: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseResponse {
    pub database_name: String,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RenameDatabaseRequest<'a> {
    pub new_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UpdateDatabaseRequest<'a> {
    pub ui: &'a DatabaseUi,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionList {
    pub regions: Vec<Region>,
}

/// Status of an asynchronous control- or data-plane operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Git-style metadata attached to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BranchMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub git_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchList {
    pub database_name: String,
    pub branches: Vec<BranchSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedFrom {
    pub branch_name: String,
    #[serde(rename = "dbBranchID")]
    pub db_branch_id: String,
    #[serde(rename = "migrationID")]
    pub migration_id: String,
}

/// Full description of a branch, including its schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDetails {
    pub database_name: String,
    pub branch_name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default, rename = "lastMigrationID")]
    pub last_migration_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<BranchMetadata>,
    #[serde(default)]
    pub started_from: Option<StartedFrom>,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CreateBranchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BranchMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchResponse {
    pub database_name: String,
    pub branch_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Usage statistics for a branch over a time window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStats {
    pub timestamp: String,
    pub interval: String,
    pub resolution: String,
    #[serde(default)]
    pub number_of_records: Vec<Value>,
    #[serde(default)]
    pub writes_over_time: Vec<Value>,
    #[serde(default)]
    pub reads_over_time: Vec<Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveReason {
    pub code: String,
    pub message: String,
}

/// Branch chosen for a git branch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveBranchResponse {
    pub branch: String,
    pub reason: ResolveReason,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_branch_details() {
        let details: BranchDetails = serde_json::from_value(json!({
            "databaseName": "docs",
            "branchName": "main",
            "id": "bb_1",
            "version": 3,
            "lastMigrationID": "mig_9",
            "createdAt": "2024-01-01T00:00:00Z",
            "metadata": {"branch": "main", "stage": "prod"},
            "schema": {"tables": [{"name": "users", "columns": []}]}
        }))
        .unwrap();

        assert_eq!(details.last_migration_id.as_deref(), Some("mig_9"));
        assert_eq!(details.schema.tables[0].name, "users");
        assert_eq!(details.metadata.unwrap().stage.as_deref(), Some("prod"));
    }

    #[test]
    fn test_create_database_encoding() {
        let mut request = CreateDatabaseRequest::new("eu-west-1");
        request.branch_name = Some("dev".to_string());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"region": "eu-west-1", "branchName": "dev"})
        );
    }

    #[test]
    fn test_resolve_branch() {
        let resolved: ResolveBranchResponse = serde_json::from_value(json!({
            "branch": "main",
            "reason": {"code": "FALLBACK_BRANCH", "message": "using fallback"}
        }))
        .unwrap();
        assert_eq!(resolved.reason.code, "FALLBACK_BRANCH");
    }
}
