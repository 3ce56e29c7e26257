//! Settings for the default HTTP transport.
//!
//! [`ClientConfig`] only covers how bytes move: retries, timeouts, the
//! connection pool and what the client announces itself as. Which workspace,
//! region, database and branch a call targets lives in
//! [`Defaults`](crate::Defaults) instead.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Connect and whole-request limits applied by the transport.
///
/// The request limit bounds a single attempt. Per-call deadlines set on a
/// [`RequestBuilder`](crate::RequestBuilder) bound the call including retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            // Search, ask and bulk inserts routinely take tens of seconds.
            request: Duration::from_secs(60),
        }
    }
}

/// Keep-alive pool shared by the control plane and every regional host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub idle_timeout: Duration,
    pub max_idle_per_host: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(90),
            max_idle_per_host: 10,
        }
    }
}

/// Configuration for [`ReqwestTransport`](crate::ReqwestTransport).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `None` sends every request exactly once.
    pub retry: Option<RetryConfig>,
    /// Accept gzip and deflate encoded responses.
    pub compression: bool,
    pub timeouts: Timeouts,
    pub pool: PoolConfig,
    /// Name of the application embedding the client, appended to the user agent.
    pub app_name: Option<String>,
    /// Emit per-attempt request and response events.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: Some(RetryConfig::default()),
            compression: true,
            timeouts: Timeouts::default(),
            pool: PoolConfig::default(),
            app_name: None,
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `xata-rs/<version>`, followed by the application name when one is set.
    pub fn user_agent(&self) -> String {
        match self.app_name.as_deref().map(str::trim) {
            Some(app) if !app.is_empty() => format!("{} {}", crate::USER_AGENT, app),
            _ => crate::USER_AGENT.to_string(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = Some(retry);
        self
    }

    pub fn without_retry(mut self) -> Self {
        self.config.retry = None;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.compression = enabled;
        self
    }

    /// Limit for a single attempt.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.request = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeouts.connect = timeout;
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.config.pool = pool;
        self
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = Some(name.into());
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.retry.is_some());
        assert!(config.compression);
        assert_eq!(config.timeouts.request, Duration::from_secs(60));
        assert_eq!(config.pool.max_idle_per_host, 10);
        assert_eq!(config.user_agent(), crate::USER_AGENT);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_request_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(1))
            .without_retry()
            .with_compression(false)
            .with_pool(PoolConfig {
                idle_timeout: Duration::from_secs(5),
                max_idle_per_host: 2,
            })
            .build();

        assert!(config.retry.is_none());
        assert!(!config.compression);
        assert_eq!(
            config.timeouts,
            Timeouts {
                connect: Duration::from_secs(1),
                request: Duration::from_secs(5),
            }
        );
        assert_eq!(config.pool.max_idle_per_host, 2);
    }

    #[test]
    fn test_app_name_is_appended_to_user_agent() {
        let config = ClientConfig::builder().with_app_name("docs-site").build();
        let agent = config.user_agent();
        assert!(agent.starts_with("xata-rs/"));
        assert!(agent.ends_with(" docs-site"));

        let blank = ClientConfig::builder().with_app_name("  ").build();
        assert_eq!(blank.user_agent(), crate::USER_AGENT);
    }
}
