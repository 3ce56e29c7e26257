//! Table and column schema types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column data type.
///
/// `file` holds one file per record and `file[]` an array of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "multiple")]
    Multiple,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "vector")]
    Vector,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file[]")]
    FileArray,
    #[serde(rename = "json")]
    Json,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::Email => "email",
            ColumnType::Multiple => "multiple",
            ColumnType::Link => "link",
            ColumnType::Object => "object",
            ColumnType::DateTime => "datetime",
            ColumnType::Vector => "vector",
            ColumnType::File => "file",
            ColumnType::FileArray => "file[]",
            ColumnType::Json => "json",
        }
    }

    /// Whether values of this type are stored as files.
    pub fn is_file(&self) -> bool {
        matches!(self, ColumnType::File | ColumnType::FileArray)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLink {
    pub table: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnVector {
    pub dimension: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_public_access: Option<bool>,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<ColumnLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<ColumnVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<ColumnFile>,
    #[serde(rename = "file[]", default, skip_serializing_if = "Option::is_none")]
    pub file_array: Option<ColumnFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Nested columns of an `object` column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            link: None,
            vector: None,
            file: None,
            file_array: None,
            not_null: None,
            default_value: None,
            unique: None,
            columns: Vec::new(),
        }
    }

    /// A `link` column pointing at `table`.
    pub fn link(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            link: Some(ColumnLink {
                table: table.into(),
            }),
            ..Self::new(name, ColumnType::Link)
        }
    }

    /// A `vector` column of the given dimension.
    pub fn vector(name: impl Into<String>, dimension: u32) -> Self {
        Self {
            vector: Some(ColumnVector { dimension }),
            ..Self::new(name, ColumnType::Vector)
        }
    }

    pub fn not_null(mut self, default_value: Value) -> Self {
        self.not_null = Some(true);
        self.default_value = Some(default_value);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    /// Make files in this column publicly readable by default.
    pub fn public_files(mut self, public: bool) -> Self {
        let options = ColumnFile {
            default_public_access: Some(public),
        };
        match self.column_type {
            ColumnType::FileArray => self.file_array = Some(options),
            _ => self.file = Some(options),
        }
        self
    }
}

/// A table in a branch schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// A branch schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableResponse {
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_column_types() {
        assert_eq!(serde_json::to_value(ColumnType::File).unwrap(), json!("file"));
        assert_eq!(serde_json::to_value(ColumnType::FileArray).unwrap(), json!("file[]"));
        let parsed: ColumnType = serde_json::from_value(json!("file[]")).unwrap();
        assert!(parsed.is_file());
    }

    #[test]
    fn test_legacy_file_map_is_not_a_column_type() {
        assert!(serde_json::from_value::<ColumnType>(json!("fileMap")).is_err());
    }

    #[test]
    fn test_column_encoding() {
        let column = Column::new("avatars", ColumnType::FileArray).public_files(true);
        assert_eq!(
            serde_json::to_value(&column).unwrap(),
            json!({"name": "avatars", "type": "file[]", "file[]": {"defaultPublicAccess": true}})
        );

        let column = Column::link("owner", "users");
        assert_eq!(
            serde_json::to_value(&column).unwrap(),
            json!({"name": "owner", "type": "link", "link": {"table": "users"}})
        );
    }

    #[test]
    fn test_schema_decoding() {
        let schema: Schema = serde_json::from_value(json!({"tables": [{
            "name": "users",
            "columns": [
                {"name": "address", "type": "object", "columns": [{"name": "city", "type": "string"}]},
                {"name": "embedding", "type": "vector", "vector": {"dimension": 3}}
            ]
        }]}))
        .unwrap();

        let users = &schema.tables[0];
        assert_eq!(users.columns[0].columns[0].name, "city");
        assert_eq!(users.columns[1].vector, Some(ColumnVector { dimension: 3 }));
    }
}
