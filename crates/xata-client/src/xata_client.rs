//! Authenticated client and generic request dispatcher.
//!
//! `XataHttpClient` holds the immutable configuration every call reads: API
//! key, base URLs, default identifiers and the transport. Each call goes
//! through [`XataHttpClient::execute`]:
//!
//! ```text
//! building ──► sent ──► 2xx ──► decoding-success ──► done
//!                  └──► other ──► ErrorMap ────────► done
//! ```
//!
//! ## Security
//!
//! - The API key is redacted in Debug output
//! - Request bodies are skipped in tracing spans

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::address::Defaults;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, ErrorMap, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::HttpResponse;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::{CONTROL_PLANE_URL, DATA_PLANE_DOMAIN};

/// Authenticated client shared by every resource client.
///
/// Cloning is cheap and clones share the same configuration and transport.
#[derive(Clone)]
pub struct XataHttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    api_key: String,
    control_plane_url: String,
    data_plane_url: Option<String>,
    defaults: Defaults,
    user_agent: String,
    timeout: Option<Duration>,
}

impl fmt::Debug for XataHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XataHttpClient")
            .field("api_key", &"[REDACTED]")
            .field("control_plane_url", &self.inner.control_plane_url)
            .field("data_plane_url", &self.inner.data_plane_url)
            .field("defaults", &self.inner.defaults)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

impl XataHttpClient {
    /// Create a client with the default transport.
    pub fn new(api_key: impl Into<String>, defaults: Defaults) -> Result<Self> {
        Self::builder(api_key).defaults(defaults).build()
    }

    /// Start building a client around an API key.
    pub fn builder(api_key: impl Into<String>) -> XataHttpClientBuilder {
        XataHttpClientBuilder::new(api_key)
    }

    /// Default identifiers used when a request leaves them unset.
    pub fn defaults(&self) -> &Defaults {
        &self.inner.defaults
    }

    pub fn control_plane_url(&self) -> &str {
        &self.inner.control_plane_url
    }

    // =========================================================================
    // URL building
    // =========================================================================

    /// URL of a control-plane path, e.g. `/workspaces`.
    pub fn control_url(&self, path: &str) -> String {
        join(&self.inner.control_plane_url, path)
    }

    /// Base URL of a workspace's data plane.
    ///
    /// `https://{workspace}.{region}.xata.sh` unless a data-plane URL override
    /// is configured. Workspace and region resolve against the defaults.
    pub fn workspace_base_url(
        &self,
        workspace: Option<&str>,
        region: Option<&str>,
    ) -> Result<String> {
        if let Some(url) = &self.inner.data_plane_url {
            return Ok(url.clone());
        }
        let workspace = self.inner.defaults.resolve_workspace(workspace)?;
        let region = self.inner.defaults.resolve_region(region)?;
        Ok(format!("https://{}.{}.{}", workspace, region, DATA_PLANE_DOMAIN))
    }

    /// URL of a data-plane path in the default workspace.
    pub fn data_url(&self, path: &str) -> Result<String> {
        Ok(join(&self.workspace_base_url(None, None)?, path))
    }

    /// Resolve the `{database}:{branch}` token against the defaults.
    pub fn db_branch(&self, database: Option<&str>, branch: Option<&str>) -> Result<String> {
        self.inner.defaults.db_branch(database, branch)
    }

    // =========================================================================
    // Request builders
    // =========================================================================

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Put, url)
    }

    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Patch, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Delete, url)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Perform one round trip. Non-2xx responses are turned into errors by `errors`.
    #[instrument(skip(self, request, errors), fields(method = request.method().as_str(), url = %request.url()))]
    pub async fn execute(&self, request: RequestBuilder, errors: ErrorMap) -> Result<HttpResponse> {
        let deadline = request
            .deadline
            .or_else(|| self.inner.timeout.map(|t| Instant::now() + t));

        let request = request.build(&self.base_headers())?;

        if let Some(deadline) = deadline {
            if deadline <= Instant::now() {
                return Err(Error::new(ErrorKind::Cancelled(
                    "deadline passed before the request was sent".to_string(),
                )));
            }
        }

        let send = self.inner.transport.send(request);
        let response = match deadline {
            Some(deadline) => {
                tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), send)
                    .await
                    .map_err(|_| Error::new(ErrorKind::Timeout))??
            }
            None => send.await?,
        };

        if response.is_success() {
            debug!(status = response.status(), "Dispatch succeeded");
            Ok(response)
        } else {
            Err(errors.map(response.status(), response.body()))
        }
    }

    /// Dispatch and decode a JSON success body into `T`.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        errors: ErrorMap,
    ) -> Result<T> {
        self.execute(request, errors).await?.json()
    }

    /// Dispatch an endpoint whose success body carries nothing of interest.
    pub async fn dispatch_empty(&self, request: RequestBuilder, errors: ErrorMap) -> Result<()> {
        self.execute(request, errors).await.map(|_| ())
    }

    /// Dispatch and return the raw success body with its content type.
    pub async fn dispatch_bytes(
        &self,
        request: RequestBuilder,
        errors: ErrorMap,
    ) -> Result<(Bytes, Option<String>)> {
        let response = self.execute(request, errors).await?;
        let content_type = response.content_type().map(str::to_string);
        Ok((response.into_body(), content_type))
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.inner.api_key),
            ),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.inner.user_agent.clone()),
        ]
    }
}

/// Builder for [`XataHttpClient`].
#[derive(Debug)]
pub struct XataHttpClientBuilder {
    api_key: String,
    defaults: Defaults,
    control_plane_url: String,
    data_plane_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    config: ClientConfig,
    timeout: Option<Duration>,
}

impl XataHttpClientBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            defaults: Defaults::new(),
            control_plane_url: CONTROL_PLANE_URL.to_string(),
            data_plane_url: None,
            transport: None,
            config: ClientConfig::default(),
            timeout: None,
        }
    }

    /// Default identifiers.
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Override the control-plane URL (proxies, tests).
    pub fn control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send every data-plane call to this URL instead of `{workspace}.{region}.xata.sh`.
    pub fn data_plane_url(mut self, url: impl Into<String>) -> Self {
        self.data_plane_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Use a custom transport. `config` is then only consulted for the user agent.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Configuration for the default transport.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Deadline applied to every call that does not set its own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<XataHttpClient> {
        if self.api_key.trim().is_empty() {
            return Err(Error::new(ErrorKind::Config("API key is empty".to_string())));
        }
        url::Url::parse(&self.control_plane_url)?;
        if let Some(url) = &self.data_plane_url {
            url::Url::parse(url)?;
        }

        let user_agent = self.config.user_agent();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config)?),
        };

        Ok(XataHttpClient {
            inner: Arc::new(Inner {
                transport,
                api_key: self.api_key,
                control_plane_url: self.control_plane_url,
                data_plane_url: self.data_plane_url,
                defaults: self.defaults,
                user_agent,
                timeout: self.timeout,
            }),
        })
    }
}

fn join(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Identifier;
    use crate::request::HttpRequest;
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> XataHttpClient {
        XataHttpClient::builder("xau_test_key")
            .control_plane_url(server.uri())
            .data_plane_url(server.uri())
            .defaults(Defaults::new().with_database("db").with_branch("main"))
            .config(ClientConfig::builder().without_retry().build())
            .build()
            .unwrap()
    }

    #[derive(Debug, Default)]
    struct CountingTransport {
        calls: AtomicU32,
    }

    impl HttpTransport for CountingTransport {
        fn send(&self, _request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(HttpResponse::new(200, HashMap::new(), "{}")) })
        }
    }

    #[derive(Debug)]
    struct StalledTransport;

    impl HttpTransport for StalledTransport {
        fn send(&self, _request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(HttpResponse::new(200, HashMap::new(), "{}"))
            })
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let c = XataHttpClient::new("xau_secret", Defaults::new()).unwrap();
        let debug = format!("{c:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("xau_secret"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = XataHttpClient::new("  ", Defaults::new()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[test]
    fn test_workspace_base_url() {
        let c = XataHttpClient::new(
            "key",
            Defaults::new()
                .with_workspace_id("ws-123")
                .with_region("eu-central-1"),
        )
        .unwrap();
        assert_eq!(
            c.workspace_base_url(None, None).unwrap(),
            "https://ws-123.eu-central-1.xata.sh"
        );
        assert_eq!(
            c.workspace_base_url(Some("other"), Some("us-east-1")).unwrap(),
            "https://other.us-east-1.xata.sh"
        );
        assert_eq!(c.control_url("/workspaces"), "https://api.xata.io/workspaces");
    }

    #[test]
    fn test_workspace_base_url_requires_workspace() {
        let c = XataHttpClient::new("key", Defaults::new().with_region("us-east-1")).unwrap();
        let err = c.data_url("/dbs").unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::MissingIdentifier(Identifier::Workspace)
        ));
    }

    #[tokio::test]
    async fn test_dispatch_sends_auth_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dbs"))
            .and(header("authorization", "Bearer xau_test_key"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"n": 3})))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server);
        let value: serde_json::Value = c
            .dispatch(c.get(c.data_url("/dbs").unwrap()), ErrorMap::STANDARD)
            .await
            .unwrap();
        assert_eq!(value["n"], 3);
    }

    #[tokio::test]
    async fn test_dispatch_maps_documented_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/db/db:missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"id": "x1", "message": "branch not found"})),
            )
            .mount(&server)
            .await;

        let c = client(&server);
        let err = c
            .dispatch::<serde_json::Value>(
                c.get(c.data_url("/db/db:missing").unwrap()),
                ErrorMap::STANDARD,
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.api_body().unwrap().status, 404);
        assert_eq!(err.api_body().unwrap().message, "branch not found");
    }

    #[tokio::test]
    async fn test_dispatch_undocumented_error_keeps_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teapot"))
            .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
            .mount(&server)
            .await;

        let c = client(&server);
        let err = c
            .dispatch_empty(c.get(c.control_url("/teapot")), ErrorMap::STANDARD)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(418));
        assert_eq!(err.raw_body(), Some("short and stout"));
    }

    #[tokio::test]
    async fn test_success_with_wrong_shape_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shape"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[1,2,3]"))
            .mount(&server)
            .await;

        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            name: String,
        }

        let c = client(&server);
        let err = c
            .dispatch::<Expected>(c.get(c.control_url("/shape")), ErrorMap::STANDARD)
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_dispatch_bytes_returns_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
            .mount(&server)
            .await;

        let c = client(&server);
        let (bytes, content_type) = c
            .dispatch_bytes(c.get(c.control_url("/file")), ErrorMap::STANDARD)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), &[0u8, 1, 2]);
        assert_eq!(content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_exactly_one_send_per_call() {
        let transport = Arc::new(CountingTransport::default());
        let c = XataHttpClient::builder("key")
            .transport(transport.clone())
            .build()
            .unwrap();

        c.dispatch_empty(c.get(c.control_url("/user")), ErrorMap::STANDARD)
            .await
            .unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_elapsed_deadline_sends_nothing() {
        let transport = Arc::new(CountingTransport::default());
        let c = XataHttpClient::builder("key")
            .transport(transport.clone())
            .build()
            .unwrap();

        let request = c
            .get(c.control_url("/user"))
            .deadline(Instant::now() - Duration::from_millis(1));
        let err = c.dispatch_empty(request, ErrorMap::STANDARD).await.unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Cancelled(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deadline_during_send_times_out() {
        let c = XataHttpClient::builder("key")
            .transport(Arc::new(StalledTransport))
            .timeout(Duration::from_millis(20))
            .build()
            .unwrap();

        let err = c
            .dispatch_empty(c.get(c.control_url("/user")), ErrorMap::STANDARD)
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Timeout));
    }
}
