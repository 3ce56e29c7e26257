//! API key type and the credential source chain.
//!
//! The key is redacted in Debug output.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::dotenv::DotEnv;
use crate::error::{Error, ErrorKind, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "XATA_API_KEY";

/// Profile read from `~/.xatarc` when none is chosen.
pub const DEFAULT_PROFILE: &str = "default";

/// Where a key was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Explicit,
    Environment(String),
    DotEnv(PathBuf),
    ConfigFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Explicit => f.write_str("explicit value"),
            CredentialSource::Environment(var) => write!(f, "environment variable {}", var),
            CredentialSource::DotEnv(path) => write!(f, "{}", path.display()),
            CredentialSource::ConfigFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A Xata API key and where it came from.
#[derive(Clone)]
pub struct ApiKey {
    key: String,
    source: CredentialSource,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl ApiKey {
    /// Wrap an explicit key. Surrounding whitespace is trimmed.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        Self::from_source(key.into(), CredentialSource::Explicit)
    }

    fn from_source(key: String, source: CredentialSource) -> Result<Self> {
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(format!(
                "empty API key from {}",
                source
            ))));
        }
        Ok(Self { key, source })
    }

    /// The key itself. Avoid logging it.
    pub fn expose(&self) -> &str {
        &self.key
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XataRc {
    api_key: Option<String>,
    #[serde(default)]
    profiles: std::collections::HashMap<String, XataRcProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XataRcProfile {
    api_key: Option<String>,
}

/// Ordered list of places to look for an API key. First match wins.
///
/// 1. explicit value
/// 2. `XATA_API_KEY` environment variable
/// 3. `.env` in the working directory
/// 4. `~/.xatarc`, top-level `apiKey` or `profiles.<profile>.apiKey`
#[derive(Clone)]
pub struct CredentialChain {
    explicit: Option<String>,
    env_var: Option<String>,
    dotenv_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    profile: String,
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialChain")
            .field("explicit", &self.explicit.as_ref().map(|_| "[REDACTED]"))
            .field("env_var", &self.env_var)
            .field("dotenv_path", &self.dotenv_path)
            .field("config_path", &self.config_path)
            .field("profile", &self.profile)
            .finish()
    }
}

impl Default for CredentialChain {
    fn default() -> Self {
        Self {
            explicit: None,
            env_var: Some(API_KEY_ENV.to_string()),
            dotenv_path: Some(PathBuf::from(".env")),
            config_path: dirs::home_dir().map(|home| home.join(".xatarc")),
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

impl CredentialChain {
    /// The standard chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this key before consulting any other source.
    pub fn with_explicit(mut self, key: impl Into<String>) -> Self {
        self.explicit = Some(key.into());
        self
    }

    /// Read the key from a different environment variable.
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = Some(name.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_var = None;
        self
    }

    pub fn with_dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.dotenv_path = None;
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn without_config_file(mut self) -> Self {
        self.config_path = None;
        self
    }

    /// Profile to read from the config file.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Walk the chain and return the first key found.
    pub fn resolve(&self) -> Result<ApiKey> {
        if let Some(key) = &self.explicit {
            return ApiKey::new(key.clone());
        }

        if let Some(var) = &self.env_var {
            if let Some(key) = std::env::var(var).ok().filter(|v| !v.trim().is_empty()) {
                debug!(source = %var, "API key found in environment");
                return ApiKey::from_source(key, CredentialSource::Environment(var.clone()));
            }
        }

        if let Some(path) = &self.dotenv_path {
            if let Some(key) = read_dotenv(path)? {
                debug!(path = %path.display(), "API key found in .env file");
                return ApiKey::from_source(key, CredentialSource::DotEnv(path.clone()));
            }
        }

        if let Some(path) = &self.config_path {
            if let Some(key) = read_xatarc(path, &self.profile)? {
                debug!(path = %path.display(), profile = %self.profile, "API key found in config file");
                return ApiKey::from_source(key, CredentialSource::ConfigFile(path.clone()));
            }
        }

        Err(Error::new(ErrorKind::NotFound(self.tried())))
    }

    fn tried(&self) -> String {
        let mut tried = Vec::new();
        if let Some(var) = &self.env_var {
            tried.push(var.clone());
        }
        if let Some(path) = &self.dotenv_path {
            tried.push(path.display().to_string());
        }
        if let Some(path) = &self.config_path {
            tried.push(path.display().to_string());
        }
        if tried.is_empty() {
            "no sources configured".to_string()
        } else {
            tried.join(", ")
        }
    }
}

fn read_dotenv(path: &Path) -> Result<Option<String>> {
    let env = DotEnv::load(path)?;
    Ok(env.and_then(|env| env.get(API_KEY_ENV).map(str::to_string)))
}

fn read_xatarc(path: &Path, profile: &str) -> Result<Option<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let rc: XataRc = serde_json::from_str(&contents)?;
    let from_profile = rc.profiles.get(profile).and_then(|p| p.api_key.clone());
    Ok(from_profile.or(rc.api_key).filter(|k| !k.trim().is_empty()))
}
