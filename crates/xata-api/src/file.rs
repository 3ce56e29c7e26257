//! File column types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata of a stored file, as returned by file endpoints and embedded in
/// record data for `file` / `file[]` columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XataFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_public_url: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

/// Raw file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Which file of a column to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot<'a> {
    /// The single file of a `file` column.
    Single,
    /// One item of a `file[]` column, by file id.
    Item(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_metadata() {
        let file: XataFile = serde_json::from_value(json!({
            "id": "f1",
            "name": "a.png",
            "mediaType": "image/png",
            "size": 42,
            "version": 1,
            "attributes": {"width": 10, "height": 10}
        }))
        .unwrap();
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.attributes.unwrap()["width"], 10);
    }
}
