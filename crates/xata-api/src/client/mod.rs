//! Typed Xata API client.
//!
//! `XataClient` wraps `XataHttpClient` from `xata-client` and provides typed
//! methods for every resource. Operations are split by resource across the
//! submodules of this module.

use std::sync::Arc;
use std::time::Duration;

use xata_auth::CredentialChain;
use xata_client::{
    encode_segment, require, ClientConfig, Defaults, HttpTransport, Identifier, Result,
    XataHttpClient,
};

mod branches;
mod databases;
mod files;
mod records;
mod search;
mod tables;
mod users;
mod workspaces;

/// Where a data-plane call goes.
///
/// Every field is optional. Unset fields fall back to the client defaults,
/// and a field missing from both fails the call before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub workspace: Option<String>,
    pub region: Option<String>,
    pub database: Option<String>,
    pub branch: Option<String>,
}

impl Address {
    /// Use the client defaults for everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Database and branch, defaults for the rest.
    pub fn branch(database: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            branch: Some(branch.into()),
            ..Default::default()
        }
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Xata API client.
///
/// Provides typed methods for:
/// - Workspaces, users and API keys (control plane)
/// - Databases and regions (control plane)
/// - Branches, schema migrations and tables
/// - Records, transactions and files
/// - Query, search, vector search, ask, summarize and aggregate
///
/// # Example
///
/// ```rust,ignore
/// use xata_api::{Address, RecordData, XataClient};
///
/// let client = XataClient::builder()
///     .workspace_id("my-ws-a1b2c3")
///     .database("docs")
///     .build()?;
///
/// let mut data = RecordData::new();
/// data.insert("title".into(), "Hello".into());
/// let record = client.insert_record(&Address::new(), "posts", &data, &[]).await?;
/// let fetched = client.get_record(&Address::new(), "posts", &record.id, &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct XataClient {
    client: XataHttpClient,
}

impl XataClient {
    /// Build a client from an API key and explicit defaults.
    pub fn new(api_key: impl Into<String>, defaults: Defaults) -> Result<Self> {
        Ok(Self {
            client: XataHttpClient::new(api_key, defaults)?,
        })
    }

    /// Start a builder that discovers the API key and reads defaults from the environment.
    pub fn builder() -> XataClientBuilder {
        XataClientBuilder::default()
    }

    /// Wrap an existing `XataHttpClient`.
    pub fn from_client(client: XataHttpClient) -> Self {
        Self { client }
    }

    /// Get the underlying `XataHttpClient`.
    pub fn inner(&self) -> &XataHttpClient {
        &self.client
    }

    pub fn defaults(&self) -> &Defaults {
        self.client.defaults()
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    /// `{base}/workspaces/{workspace}{suffix}` on the control plane.
    fn workspace_path(&self, workspace: Option<&str>, suffix: &str) -> Result<String> {
        let workspace = self.defaults().resolve_workspace(workspace)?;
        Ok(self.client.control_url(&format!(
            "/workspaces/{}{}",
            encode_segment(&workspace),
            suffix
        )))
    }

    /// `{data plane}/dbs/{database}{suffix}`.
    fn database_url(&self, address: &Address, suffix: &str) -> Result<String> {
        let database = self
            .defaults()
            .resolve_database(address.database.as_deref())?;
        let base = self
            .client
            .workspace_base_url(address.workspace.as_deref(), address.region.as_deref())?;
        Ok(format!("{}/dbs/{}{}", base, encode_segment(&database), suffix))
    }

    /// `{data plane}/db/{database}:{branch}{suffix}`.
    fn branch_url(&self, address: &Address, suffix: &str) -> Result<String> {
        let db_branch = self
            .client
            .db_branch(address.database.as_deref(), address.branch.as_deref())?;
        let base = self
            .client
            .workspace_base_url(address.workspace.as_deref(), address.region.as_deref())?;
        Ok(format!("{}/db/{}{}", base, encode_segment(&db_branch), suffix))
    }

    /// `{branch url}/tables/{table}{suffix}`.
    fn table_url(&self, address: &Address, table: &str, suffix: &str) -> Result<String> {
        let table = require(Identifier::Table, table)?;
        self.branch_url(
            address,
            &format!("/tables/{}{}", encode_segment(table), suffix),
        )
    }

    /// `{table url}/data/{id}{suffix}`.
    fn record_url(&self, address: &Address, table: &str, id: &str, suffix: &str) -> Result<String> {
        let id = require(Identifier::Record, id)?;
        self.table_url(address, table, &format!("/data/{}{}", encode_segment(id), suffix))
    }
}

/// Builder for [`XataClient`].
///
/// Layers, lowest precedence first: environment defaults, then explicit
/// values set here. The API key comes from the credential chain unless set
/// explicitly.
#[derive(Debug)]
pub struct XataClientBuilder {
    api_key: Option<String>,
    credentials: CredentialChain,
    defaults: Defaults,
    env_defaults: bool,
    control_plane_url: Option<String>,
    data_plane_url: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    config: Option<ClientConfig>,
    timeout: Option<Duration>,
}

impl Default for XataClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            credentials: CredentialChain::new(),
            defaults: Defaults::new(),
            env_defaults: true,
            control_plane_url: None,
            data_plane_url: None,
            transport: None,
            config: None,
            timeout: None,
        }
    }
}

impl XataClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Credential chain consulted when no key is set explicitly.
    pub fn credentials(mut self, credentials: CredentialChain) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.defaults = self.defaults.with_workspace_id(workspace_id);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.defaults = self.defaults.with_region(region);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.defaults = self.defaults.with_database(database);
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.defaults = self.defaults.with_branch(branch);
        self
    }

    /// Explicit defaults, overlaid on the environment ones.
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = self.defaults.merge(defaults);
        self
    }

    /// Skip `XATA_*` environment variables when computing defaults.
    pub fn without_env_defaults(mut self) -> Self {
        self.env_defaults = false;
        self
    }

    pub fn control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = Some(url.into());
        self
    }

    pub fn data_plane_url(mut self, url: impl Into<String>) -> Self {
        self.data_plane_url = Some(url.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Deadline applied to every call that does not set its own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<XataClient> {
        let credentials = match self.api_key {
            Some(key) => self.credentials.with_explicit(key),
            None => self.credentials,
        };
        let api_key = credentials.resolve()?;

        let defaults = if self.env_defaults {
            Defaults::from_env().merge(self.defaults)
        } else {
            self.defaults
        };

        let mut builder = XataHttpClient::builder(api_key.into_string()).defaults(defaults);
        if let Some(url) = self.control_plane_url {
            builder = builder.control_plane_url(url);
        }
        if let Some(url) = self.data_plane_url {
            builder = builder.data_plane_url(url);
        }
        if let Some(transport) = self.transport {
            builder = builder.transport(transport);
        }
        if let Some(config) = self.config {
            builder = builder.config(config);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(XataClient::from_client(builder.build()?))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use xata_client::ErrorKind;

    fn client() -> XataClient {
        XataClient::builder()
            .api_key("xau_test")
            .without_env_defaults()
            .workspace_id("ws-1")
            .region("eu-west-1")
            .database("db")
            .build()
            .unwrap()
    }

    #[test]
    fn test_branch_url_uses_defaults() {
        let c = XataClient::new(
            "xau_test",
            client().defaults().clone().with_branch("main"),
        )
        .unwrap();
        assert_eq!(
            c.branch_url(&Address::new(), "/tables").unwrap(),
            "https://ws-1.eu-west-1.xata.sh/db/db:main/tables"
        );
        assert_eq!(
            c.branch_url(&Address::branch("other", "dev").with_region("us-east-1"), "")
                .unwrap(),
            "https://ws-1.us-east-1.xata.sh/db/other:dev"
        );
    }

    #[test]
    fn test_missing_branch_is_usage_error() {
        let err = client().branch_url(&Address::new(), "").unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::MissingIdentifier(Identifier::Branch)
        ));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_missing_database_is_reported_first() {
        let c = XataClient::builder()
            .api_key("xau_test")
            .without_env_defaults()
            .workspace_id("ws-1")
            .region("us-east-1")
            .build()
            .unwrap();
        let err = c.branch_url(&Address::new(), "").unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::MissingIdentifier(Identifier::Database)
        ));
    }

    #[test]
    fn test_record_url_requires_table_and_id() {
        let c = client();
        let address = Address::new().with_branch("main");
        let err = c.record_url(&address, "", "rec", "").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingIdentifier(Identifier::Table)));
        let err = c.record_url(&address, "users", " ", "").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingIdentifier(Identifier::Record)));
        assert_eq!(
            c.record_url(&address, "users", "rec 1", "/column/avatar/file").unwrap(),
            "https://ws-1.eu-west-1.xata.sh/db/db:main/tables/users/data/rec%201/column/avatar/file"
        );
    }

    #[test]
    fn test_workspace_path() {
        let c = client();
        assert_eq!(
            c.workspace_path(None, "/dbs").unwrap(),
            "https://api.xata.io/workspaces/ws-1/dbs"
        );
    }

    #[test]
    fn test_builder_reads_key_from_credential_chain() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".xatarc");
        std::fs::write(&rc, r#"{"apiKey":"xau_from_rc"}"#).unwrap();

        let chain = CredentialChain::new()
            .with_env_var("XATA_API_TEST_NEVER_SET")
            .without_dotenv()
            .with_config_path(&rc);
        let c = XataClient::builder()
            .credentials(chain)
            .without_env_defaults()
            .build();
        assert!(c.is_ok());
    }

    #[test]
    fn test_builder_without_any_key_fails() {
        let chain = CredentialChain::new()
            .with_env_var("XATA_API_TEST_NEVER_SET")
            .without_dotenv()
            .without_config_file();
        let err = XataClient::builder()
            .credentials(chain)
            .without_env_defaults()
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }
}
