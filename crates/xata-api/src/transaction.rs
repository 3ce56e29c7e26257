//! Atomic multi-operation transactions against one branch.
//!
//! Each operation is a single-key object (`{"insert": {...}}`) and each
//! result carries an `operation` tag. Both are bare unions decoded by trial.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::values::RecordData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInsert {
    pub table: String,
    pub record: RecordData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_only: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub table: String,
    pub id: String,
    pub fields: RecordData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDelete {
    pub table: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionGet {
    pub table: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertOperation {
    pub insert: TransactionInsert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOperation {
    pub update: TransactionUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteOperation {
    pub delete: TransactionDelete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetOperation {
    pub get: TransactionGet,
}

/// One step of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionOperation {
    Insert(InsertOperation),
    Update(UpdateOperation),
    Delete(DeleteOperation),
    Get(GetOperation),
}

xata_client::impl_polymorphic!(
    TransactionOperation,
    "TransactionOperation",
    [
        Insert(InsertOperation),
        Update(UpdateOperation),
        Delete(DeleteOperation),
        Get(GetOperation),
    ]
);

impl TransactionOperation {
    pub fn insert(table: impl Into<String>, record: RecordData) -> Self {
        Self::Insert(InsertOperation {
            insert: TransactionInsert {
                table: table.into(),
                record,
                if_version: None,
                create_only: None,
            },
        })
    }

    pub fn update(table: impl Into<String>, id: impl Into<String>, fields: RecordData) -> Self {
        Self::Update(UpdateOperation {
            update: TransactionUpdate {
                table: table.into(),
                id: id.into(),
                fields,
                if_version: None,
                upsert: None,
            },
        })
    }

    pub fn delete(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Delete(DeleteOperation {
            delete: TransactionDelete {
                table: table.into(),
                id: id.into(),
            },
        })
    }

    pub fn get(table: impl Into<String>, id: impl Into<String>, columns: Vec<String>) -> Self {
        Self::Get(GetOperation {
            get: TransactionGet {
                table: table.into(),
                id: id.into(),
                columns,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertTag {
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateTag {
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteTag {
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GetTag {
    Get,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertResult {
    pub operation: InsertTag,
    pub id: String,
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub operation: UpdateTag,
    pub id: String,
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub operation: DeleteTag,
    pub rows: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResult {
    pub operation: GetTag,
    /// The fetched record, or `null` when it does not exist.
    #[serde(default)]
    pub columns: Value,
}

/// Outcome of one transaction step, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionResult {
    Insert(InsertResult),
    Update(UpdateResult),
    Delete(DeleteResult),
    Get(GetResult),
}

xata_client::impl_polymorphic!(
    TransactionResult,
    "TransactionResult",
    [
        Insert(InsertResult),
        Update(UpdateResult),
        Delete(DeleteResult),
        Get(GetResult),
    ]
);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest<'a> {
    pub operations: &'a [TransactionOperation],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionResponse {
    pub results: Vec<TransactionResult>,
}

/// One failed step of a rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionError {
    /// Position of the failing operation in the request.
    #[serde(default)]
    pub index: Option<usize>,
    pub message: String,
}

/// Body of a transaction rejected with 400. Nothing was applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionFailure {
    pub errors: Vec<TransactionError>,
}

impl TransactionFailure {
    /// Recover the per-operation errors from a failed transaction call.
    pub fn from_error(error: &xata_client::Error) -> Option<Self> {
        if error.status() != Some(400) {
            return None;
        }
        serde_json::from_str(error.raw_body()?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xata_client::Polymorphic;

    #[test]
    fn test_operation_encoding() {
        let mut record = RecordData::new();
        record.insert("name".into(), "alice".into());

        let ops = vec![
            TransactionOperation::insert("users", record),
            TransactionOperation::delete("users", "rec_2"),
        ];
        assert_eq!(
            serde_json::to_value(TransactionRequest { operations: &ops }).unwrap(),
            json!({"operations": [
                {"insert": {"table": "users", "record": {"name": "alice"}}},
                {"delete": {"table": "users", "id": "rec_2"}}
            ]})
        );
    }

    #[test]
    fn test_operation_decoding() {
        let op: TransactionOperation =
            serde_json::from_value(json!({"get": {"table": "t", "id": "1"}})).unwrap();
        assert_eq!(op.variant(), "Get");

        let err = serde_json::from_value::<TransactionOperation>(json!({"merge": {}})).unwrap_err();
        assert!(err.to_string().contains("TransactionOperation"));
    }

    #[test]
    fn test_results_use_the_operation_tag() {
        let response: TransactionResponse = serde_json::from_value(json!({"results": [
            {"operation": "insert", "id": "a", "rows": 1},
            {"operation": "update", "id": "b", "rows": 1},
            {"operation": "delete", "rows": 0},
            {"operation": "get", "columns": {"id": "a"}}
        ]}))
        .unwrap();

        let variants: Vec<_> = response.results.iter().map(|r| r.variant()).collect();
        assert_eq!(variants, vec!["Insert", "Update", "Delete", "Get"]);
    }
}
