//! # xata-rs
//!
//! A Xata API client library for Rust.
//!
//! This library provides typed access to the Xata control plane (workspaces,
//! users, databases) and data plane (branches, schema, records, files,
//! search) with API key discovery, retries and structured errors.
//!
//! ## Security
//!
//! - API keys are redacted in Debug output
//! - Tracing spans skip request bodies and credentials
//! - Error messages redact anything that looks like an API key
//!
//! ## Crates
//!
//! - **xata-client** - Identifier resolution, value codec, error mapping and the request dispatcher
//! - **xata-auth** - API key discovery: explicit value, environment, `.env` and `~/.xatarc`
//! - **xata-api** - Typed resource clients for every endpoint group
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xata_rs::{Address, RecordData, XataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xata_rs::Error> {
//!     let client = XataClient::builder()
//!         .workspace_id("acme-abc123")
//!         .region("us-east-1")
//!         .database("docs")
//!         .build()?;
//!
//!     let mut data = RecordData::new();
//!     data.insert("user-name".into(), "alice".into());
//!     data.insert("active".into(), true.into());
//!
//!     let here = Address::new();
//!     let record = client.insert_record(&here, "users", &data, &[]).await?;
//!     let fetched = client.get_record(&here, "users", &record.id, &[]).await?;
//!     println!("{:?}", fetched.data);
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "api")]
pub use xata_api as api;
#[cfg(feature = "auth")]
pub use xata_auth as auth;
#[cfg(feature = "client")]
pub use xata_client as client;

// Re-export commonly used types at the top level
#[cfg(feature = "api")]
pub use xata_api::{Address, RecordData, XataClient, XataClientBuilder};
#[cfg(feature = "auth")]
pub use xata_auth::{ApiKey, CredentialChain};
#[cfg(feature = "client")]
pub use xata_client::{ClientConfig, Defaults, Error, ErrorKind, Result, XataHttpClient};
