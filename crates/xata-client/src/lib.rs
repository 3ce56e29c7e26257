//! # xata-client
//!
//! Core HTTP infrastructure for the Xata API.
//!
//! This crate provides the pieces every resource client is built on:
//! - Identifier defaults and resolution (workspace, region, database, branch)
//! - Request dispatch with per-endpoint error mapping
//! - Pluggable transport, with a pooled reqwest default that retries with backoff
//! - Untagged union codec with explicit trial order
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Resource clients                         │
//! │  (xata-api: workspaces, databases, branches, records, ...) │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    XataHttpClient                           │
//! │  - Holds API key, base URLs, defaults                       │
//! │  - Builds requests, applies deadlines                       │
//! │  - Maps non-2xx responses through an ErrorMap               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HttpTransport                            │
//! │  - ReqwestTransport: retry, compression, pooling            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use xata_client::{Defaults, ErrorMap, XataHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xata_client::Error> {
//!     let client = XataHttpClient::new("xau_...", Defaults::from_env())?;
//!
//!     let user: serde_json::Value = client
//!         .dispatch(client.get(client.control_url("/user")), ErrorMap::STANDARD)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod codec;
mod config;
mod error;
mod request;
mod response;
mod retry;
mod transport;
mod xata_client;

pub use address::{db_branch_name, encode_segment, require, Defaults, DEFAULT_BRANCH, DEFAULT_REGION};
pub use codec::{Polymorphic, UnionDecodeError};
pub use config::{ClientConfig, ClientConfigBuilder, PoolConfig, Timeouts};
pub use error::{ApiErrorBody, Error, ErrorKind, ErrorMap, Identifier, Result};
pub use request::{HttpRequest, RequestBody, RequestBuilder, RequestMethod};
pub use response::HttpResponse;
pub use retry::{BackoffStrategy, RetryConfig, RetryDecision, RetryPolicy};
pub use transport::{HttpTransport, ReqwestTransport};
pub use xata_client::{XataHttpClient, XataHttpClientBuilder};

/// Default User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("xata-rs/", env!("CARGO_PKG_VERSION"));

/// Control-plane base URL.
pub const CONTROL_PLANE_URL: &str = "https://api.xata.io";

/// Domain suffix of workspace data-plane hosts.
pub const DATA_PLANE_DOMAIN: &str = "xata.sh";

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}
