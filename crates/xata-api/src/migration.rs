//! Schema migration operations applied to a branch.

use serde::{Deserialize, Serialize};

use crate::table::Column;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableName {
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRename {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAdd {
    pub table: String,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRemove {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRename {
    pub table: String,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddTableOp {
    pub add_table: TableName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoveTableOp {
    pub remove_table: TableName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenameTableOp {
    pub rename_table: TableRename,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddColumnOp {
    pub add_column: ColumnAdd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoveColumnOp {
    pub remove_column: ColumnRemove,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenameColumnOp {
    pub rename_column: ColumnRename,
}

/// One schema change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MigrationOp {
    AddTable(AddTableOp),
    RemoveTable(RemoveTableOp),
    RenameTable(RenameTableOp),
    AddColumn(AddColumnOp),
    RemoveColumn(RemoveColumnOp),
    RenameColumn(RenameColumnOp),
}

xata_client::impl_polymorphic!(
    MigrationOp,
    "MigrationOp",
    [
        AddTable(AddTableOp),
        RemoveTable(RemoveTableOp),
        RenameTable(RenameTableOp),
        AddColumn(AddColumnOp),
        RemoveColumn(RemoveColumnOp),
        RenameColumn(RenameColumnOp),
    ]
);

impl MigrationOp {
    pub fn add_table(table: impl Into<String>) -> Self {
        Self::AddTable(AddTableOp {
            add_table: TableName { table: table.into() },
        })
    }

    pub fn remove_table(table: impl Into<String>) -> Self {
        Self::RemoveTable(RemoveTableOp {
            remove_table: TableName { table: table.into() },
        })
    }

    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable(RenameTableOp {
            rename_table: TableRename {
                old_name: old_name.into(),
                new_name: new_name.into(),
            },
        })
    }

    pub fn add_column(table: impl Into<String>, column: Column) -> Self {
        Self::AddColumn(AddColumnOp {
            add_column: ColumnAdd {
                table: table.into(),
                column,
            },
        })
    }

    pub fn remove_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::RemoveColumn(RemoveColumnOp {
            remove_column: ColumnRemove {
                table: table.into(),
                column: column.into(),
            },
        })
    }

    pub fn rename_column(
        table: impl Into<String>,
        old_name: impl Into<String>,
        new_name: impl Into<String>,
    ) -> Self {
        Self::RenameColumn(RenameColumnOp {
            rename_column: ColumnRename {
                table: table.into(),
                old_name: old_name.into(),
                new_name: new_name.into(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyMigrationRequest<'a> {
    pub operations: &'a [MigrationOp],
}

/// Result of a schema change.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResponse {
    #[serde(default, rename = "migrationID")]
    pub migration_id: Option<String>,
    #[serde(default, rename = "parentMigrationID")]
    pub parent_migration_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One entry of a branch's schema history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaCommit {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub operations: Vec<MigrationOp>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SchemaHistoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<crate::search::PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SchemaHistoryResponse {
    #[serde(default)]
    pub meta: Option<crate::search::PageMeta>,
    pub logs: Vec<SchemaCommit>,
}
