//! Pluggable HTTP transport and the default reqwest implementation.
//!
//! The dispatcher hands a fully built [`HttpRequest`] to a transport and gets
//! back an [`HttpResponse`] for every status code, or an error when no response
//! arrived. Retries, pooling and compression are transport concerns.

use std::collections::HashMap;
use std::fmt::Debug;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::retry::{RetryDecision, RetryPolicy};

/// Sends one request and returns the response, whatever its status.
///
/// Implementations must be safe to share between concurrent calls.
pub trait HttpTransport: Send + Sync + Debug {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// Default transport: pooled reqwest client with retry, compression and tracing.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Create a transport from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeouts.request)
            .connect_timeout(config.timeouts.connect)
            .pool_idle_timeout(config.pool.idle_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .user_agent(config.user_agent())
            .gzip(config.compression)
            .deflate(config.compression)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a transport with default configuration.
    pub fn default_transport() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_with_retry(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut policy = self.config.retry.clone().map(RetryPolicy::new);

        loop {
            let outcome = self.send_once(&request).await;

            let decision = match (&outcome, policy.as_mut()) {
                (_, None) => RetryDecision::Stop,
                (Ok(response), Some(policy)) => {
                    policy.on_status(response.status(), response.retry_after())
                }
                (Err(err), Some(policy)) => policy.on_transport_error(err.is_retryable()),
            };

            match decision {
                RetryDecision::Stop => return outcome,
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        method = request.method.as_str(),
                        url = %request.url,
                        status = outcome.as_ref().ok().map(HttpResponse::status),
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.url.clone());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        if self.config.enable_tracing {
            debug!(method = request.method.as_str(), url = %request.url, "Sending request");
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?;

        if self.config.enable_tracing {
            if (200..300).contains(&status) {
                debug!(status, content_length = body.len(), "Response received");
            } else {
                info!(status, content_length = body.len(), "Non-success response");
            }
        }

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        Box::pin(self.send_with_retry(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{RequestBuilder, RequestMethod};
    use crate::retry::{BackoffStrategy, RetryConfig};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry(retries: u32) -> ClientConfig {
        ClientConfig::builder()
            .with_retry(
                RetryConfig::default()
                    .with_max_retries(retries)
                    .with_backoff(BackoffStrategy::Constant)
                    .with_initial_delay(Duration::from_millis(5)),
            )
            .build()
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"gone"}"#))
            .mount(&server)
            .await;

        let transport =
            ReqwestTransport::new(ClientConfig::builder().without_retry().build()).unwrap();
        let request = RequestBuilder::new(RequestMethod::Get, format!("{}/missing", server.uri()))
            .build(&[])
            .unwrap();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(response.text(), r#"{"message":"gone"}"#);
    }

    #[tokio::test]
    async fn test_headers_and_body_are_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/upload"))
            .and(header("content-type", "text/plain"))
            .and(header("authorization", "Bearer key"))
            .and(body_bytes(b"hello".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::default_transport().unwrap();
        let request = RequestBuilder::new(RequestMethod::Put, format!("{}/upload", server.uri()))
            .bytes(&b"hello"[..], "text/plain")
            .build(&[("Authorization".to_string(), "Bearer key".to_string())])
            .unwrap();

        assert_eq!(transport.send(request).await.unwrap().status(), 200);
    }

    #[tokio::test]
    async fn test_retry_on_503() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(move |_: &wiremock::Request| {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true}))
                }
            })
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(fast_retry(3)).unwrap();
        let request = RequestBuilder::new(RequestMethod::Get, format!("{}/flaky", server.uri()))
            .build(&[])
            .unwrap();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_last_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(3)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(fast_retry(2)).unwrap();
        let request = RequestBuilder::new(RequestMethod::Get, format!("{}/down", server.uri()))
            .build(&[])
            .unwrap();

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 503);
        assert_eq!(response.text(), "maintenance");
    }

    #[tokio::test]
    async fn test_client_errors_are_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(fast_retry(3)).unwrap();
        let request = RequestBuilder::new(RequestMethod::Get, format!("{}/bad", server.uri()))
            .build(&[])
            .unwrap();

        assert_eq!(transport.send(request).await.unwrap().status(), 400);
    }
}
