//! # xata-auth
//!
//! API key discovery for the Xata API.
//!
//! Xata authenticates every call with a bearer API key. This crate finds one:
//!
//! 1. an explicit value
//! 2. the `XATA_API_KEY` environment variable
//! 3. a `.env` file in the working directory
//! 4. `~/.xatarc`
//!
//! ## Security
//!
//! - Keys are redacted in Debug output
//! - Error messages name the sources tried, never their contents
//!
//! ## Example
//!
//! ```rust,ignore
//! use xata_auth::CredentialChain;
//!
//! let key = CredentialChain::new().resolve()?;
//! println!("using key from {}", key.source());
//! ```

mod credentials;
mod dotenv;
mod error;

pub use credentials::{ApiKey, CredentialChain, CredentialSource, API_KEY_ENV, DEFAULT_PROFILE};
pub use dotenv::DotEnv;
pub use error::{Error, ErrorKind, Result};
