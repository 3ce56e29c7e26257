//! Column values accepted by record writes.
//!
//! [`DataInputValue`] is a bare JSON union: on the wire a value is just a
//! string, number, list or object, and decoding infers the variant by
//! trying each shape in its
//! [`TRIAL_ORDER`](xata_client::Polymorphic::TRIAL_ORDER).

use std::collections::BTreeMap;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use xata_client::codec;
use xata_client::UnionDecodeError;

/// Column name to value, as sent by inserts and updates.
pub type RecordData = BTreeMap<String, DataInputValue>;

/// A file to upload inline with a record write.
///
/// Unknown keys are rejected so that generic objects never decode as files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_public_url: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url_timeout: Option<u32>,
}

impl InputFile {
    /// File with the given name and no content yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// File with inline content, base64-encoded for transport.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: Some(media_type.into()),
            base64_content: Some(base64::engine::general_purpose::STANDARD.encode(content)),
            ..Default::default()
        }
    }

    pub fn with_public_url(mut self, enabled: bool) -> Self {
        self.enable_public_url = Some(enabled);
        self
    }

    pub fn with_signed_url_timeout(mut self, seconds: u32) -> Self {
        self.signed_url_timeout = Some(seconds);
        self
    }

    /// Decode the inline content, if any.
    pub fn decode_content(&self) -> Option<Vec<u8>> {
        let content = self.base64_content.as_ref()?;
        base64::engine::general_purpose::STANDARD
            .decode(content)
            .ok()
    }
}

/// Largest integer an `f64` holds exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// An integer outside the range a JSON double represents exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("integer {0} is outside the exact range of a double (±{max})", max = MAX_SAFE_INTEGER)]
pub struct IntegerOutOfRange(pub i64);

/// Convert an integer to a double, refusing values that would lose precision.
pub fn exact_double(value: i64) -> Result<f64, IntegerOutOfRange> {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
        Ok(value as f64)
    } else {
        Err(IntegerOutOfRange(value))
    }
}

/// Value of one column in a record write.
///
/// The wire form carries no variant tag, so two payloads decode as a
/// different variant than the one they were built with:
///
/// - a `String` holding an RFC 3339 timestamp comes back as `DateTime`;
/// - an empty `DoubleList` or `InputFileArray` comes back as `StringList`.
///
/// Both encode to the same JSON either way, so the server sees the same
/// value. Decoding bytes, encoding and decoding again always yields the
/// same variant.
///
/// Build values with `From`:
///
/// ```rust
/// use xata_api::{DataInputValue, RecordData};
///
/// let mut record = RecordData::new();
/// record.insert("user-name".into(), "alice".into());
/// record.insert("active".into(), true.into());
/// record.insert("score".into(), 4.5.into());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataInputValue {
    DateTime(DateTime<Utc>),
    String(String),
    Bool(bool),
    Double(f64),
    StringList(Vec<String>),
    DoubleList(Vec<f64>),
    InputFile(InputFile),
    InputFileArray(Vec<InputFile>),
    Object(Map<String, Value>),
}

// RFC 3339 strings decode as date-times, other strings as text. Input files
// come before generic objects.
xata_client::impl_polymorphic!(
    DataInputValue,
    "DataInputValue",
    [
        DateTime(DateTime<Utc>),
        String(String),
        Bool(bool),
        Double(f64),
        StringList(Vec<String>),
        DoubleList(Vec<f64>),
        InputFile(InputFile),
        InputFileArray(Vec<InputFile>),
        Object(Map<String, Value>),
    ]
);

impl DataInputValue {
    /// Classify an arbitrary JSON value. Fails for `null` and mixed lists.
    pub fn try_from_json(value: &Value) -> Result<Self, UnionDecodeError> {
        codec::from_value(value)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataInputValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataInputValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataInputValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for DataInputValue {
    fn from(value: &str) -> Self {
        DataInputValue::String(value.to_string())
    }
}

impl From<String> for DataInputValue {
    fn from(value: String) -> Self {
        DataInputValue::String(value)
    }
}

impl From<bool> for DataInputValue {
    fn from(value: bool) -> Self {
        DataInputValue::Bool(value)
    }
}

impl From<f64> for DataInputValue {
    fn from(value: f64) -> Self {
        DataInputValue::Double(value)
    }
}

impl From<i32> for DataInputValue {
    fn from(value: i32) -> Self {
        DataInputValue::Double(f64::from(value))
    }
}

impl TryFrom<i64> for DataInputValue {
    type Error = IntegerOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        exact_double(value).map(DataInputValue::Double)
    }
}

impl From<DateTime<Utc>> for DataInputValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataInputValue::DateTime(value)
    }
}

impl From<Vec<String>> for DataInputValue {
    fn from(value: Vec<String>) -> Self {
        DataInputValue::StringList(value)
    }
}

impl From<Vec<f64>> for DataInputValue {
    fn from(value: Vec<f64>) -> Self {
        DataInputValue::DoubleList(value)
    }
}

impl From<InputFile> for DataInputValue {
    fn from(value: InputFile) -> Self {
        DataInputValue::InputFile(value)
    }
}

impl From<Vec<InputFile>> for DataInputValue {
    fn from(value: Vec<InputFile>) -> Self {
        DataInputValue::InputFileArray(value)
    }
}

impl From<Map<String, Value>> for DataInputValue {
    fn from(value: Map<String, Value>) -> Self {
        DataInputValue::Object(value)
    }
}
