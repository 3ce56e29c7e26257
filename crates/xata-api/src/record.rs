//! Records as returned by the data plane.
//!
//! The server mixes user columns with two reserved keys: `id` and `xata`
//! (system metadata). Decoding lifts both out, so [`Record::data`] only ever
//! holds user columns.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key holding the record id.
pub const ID_KEY: &str = "id";

/// Key holding system metadata.
pub const METADATA_KEY: &str = "xata";

/// System metadata attached to every record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XataMetadata {
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Table the record came from (search results).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Relevance score (search results).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Highlighted matches (search results with highlighting).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Value>,
}

/// A record: id, typed metadata and the remaining user columns.
///
/// Each decode produces a fresh value; records are never patched in place
/// by the client.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: String,
    pub xata: XataMetadata,
    pub data: Map<String, Value>,
}

impl Record {
    /// Value of a user column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// Decode the user columns into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(Value::Object(self.data.clone()))
    }

    /// Split a raw JSON object into id, metadata and user data.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, String> {
        let id = match map.remove(ID_KEY) {
            Some(Value::String(id)) => id,
            Some(other) => return Err(format!("record id must be a string, got {}", other)),
            None => return Err("record has no id".to_string()),
        };

        let xata = match map.remove(METADATA_KEY) {
            Some(meta) => serde_json::from_value(meta).map_err(|e| e.to_string())?,
            None => XataMetadata::default(),
        };

        Ok(Self { id, xata, data: map })
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        Record::from_map(map).map_err(D::Error::custom)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = self.data.clone();
        map.insert(ID_KEY.to_string(), Value::String(self.id.clone()));
        let meta = serde_json::to_value(&self.xata).map_err(serde::ser::Error::custom)?;
        map.insert(METADATA_KEY.to_string(), meta);
        map.serialize(serializer)
    }
}

/// Options shared by id-addressed writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordWriteOptions {
    /// Columns to return. Empty returns the server default.
    pub columns: Vec<String>,
    /// Fail with 422 if the record already exists (insert with id only).
    pub create_only: Option<bool>,
    /// Fail with 422 unless the stored version matches.
    pub if_version: Option<u64>,
}

impl RecordWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn create_only(mut self, create_only: bool) -> Self {
        self.create_only = Some(create_only);
        self
    }

    pub fn if_version(mut self, version: u64) -> Self {
        self.if_version = Some(version);
        self
    }
}

/// Result of a bulk insert: ids, or full records when columns were requested.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkInsertResponse {
    #[serde(default, rename = "recordIDs")]
    pub record_ids: Vec<String>,
    #[serde(default)]
    pub records: Vec<Record>,
}
