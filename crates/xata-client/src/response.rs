//! HTTP response as returned by a transport.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl HttpResponse {
    /// Create a response. Header names are normalized to lowercase.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Request id assigned by the API, useful when reporting issues.
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Get the Retry-After header as a Duration (seconds form only).
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Borrow the body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Take the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    ///
    /// An empty body is decoded as JSON `null`, so `()` and `Option<T>`
    /// destinations accept 204 responses.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };

        serde_json::from_slice(body).map_err(|e| {
            Error::with_source(
                ErrorKind::ResponseDecode(format!("status {}: {}", self.status, e)),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Retry-After".to_string(), "30".to_string());
        HttpResponse::new(status, headers, body)
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let resp = response(200, "{}");
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.retry_after(), Some(Duration::from_secs(30)));
        assert!(resp.request_id().is_none());
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, "").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(304, "").is_success());
        assert!(!response(404, "").is_success());
    }

    #[test]
    fn test_json_decode() {
        #[derive(serde::Deserialize)]
        struct Status {
            status: String,
        }
        let decoded: Status = response(200, r#"{"status":"completed"}"#).json().unwrap();
        assert_eq!(decoded.status, "completed");
    }

    #[test]
    fn test_json_decode_failure_is_response_decode() {
        let err = response(200, "not json").json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ResponseDecode(_)));
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        response(204, "").json::<()>().unwrap();
        assert!(response(204, "").json::<Option<u32>>().unwrap().is_none());
    }
}
