//! Resource addressing: call-site identifiers layered over client defaults.
//!
//! Every data-plane endpoint is addressed by a `{database}:{branch}` token and
//! control-plane endpoints by `/{resource}/{id}` segments. Each identifier is
//! resolved the same way:
//!
//! 1. the value set on the request, if non-empty;
//! 2. otherwise the client default, if non-empty;
//! 3. otherwise a usage error naming the identifier.
//!
//! Resolution is pure and runs before any network I/O.

use crate::error::{Error, Identifier, Result};

/// Branch used by the hosted service when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Region used by the hosted service when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client-level default identifiers. Immutable once the client is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    workspace_id: Option<String>,
    region: Option<String>,
    database: Option<String>,
    branch: Option<String>,
}

impl Defaults {
    /// Defaults with nothing set; every identifier must come from the call site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read defaults from the environment.
    ///
    /// - `XATA_WORKSPACE_ID`
    /// - `XATA_REGION` (default: `us-east-1`)
    /// - `XATA_DATABASE` or `XATA_DATABASE_NAME`
    /// - `XATA_BRANCH` (default: `main`)
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            workspace_id: var("XATA_WORKSPACE_ID"),
            region: var("XATA_REGION").or_else(|| Some(DEFAULT_REGION.to_string())),
            database: var("XATA_DATABASE").or_else(|| var("XATA_DATABASE_NAME")),
            branch: var("XATA_BRANCH").or_else(|| Some(DEFAULT_BRANCH.to_string())),
        }
    }

    /// Set the default workspace id.
    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Set the default region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the default database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the default branch name.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Overlay `other` on top of `self`: values set in `other` win.
    pub fn merge(self, other: Defaults) -> Self {
        Self {
            workspace_id: other.workspace_id.or(self.workspace_id),
            region: other.region.or(self.region),
            database: other.database.or(self.database),
            branch: other.branch.or(self.branch),
        }
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Resolve one identifier from a call-site value and this default set.
    pub fn resolve(&self, identifier: Identifier, call_site: Option<&str>) -> Result<String> {
        let default = match identifier {
            Identifier::Workspace => self.workspace_id(),
            Identifier::Region => self.region(),
            Identifier::Database => self.database(),
            Identifier::Branch => self.branch(),
            _ => None,
        };

        first_set(call_site, default)
            .map(str::to_string)
            .ok_or_else(|| Error::missing(identifier))
    }

    pub fn resolve_workspace(&self, call_site: Option<&str>) -> Result<String> {
        self.resolve(Identifier::Workspace, call_site)
    }

    pub fn resolve_region(&self, call_site: Option<&str>) -> Result<String> {
        self.resolve(Identifier::Region, call_site)
    }

    pub fn resolve_database(&self, call_site: Option<&str>) -> Result<String> {
        self.resolve(Identifier::Database, call_site)
    }

    pub fn resolve_branch(&self, call_site: Option<&str>) -> Result<String> {
        self.resolve(Identifier::Branch, call_site)
    }

    /// Resolve the compound `{database}:{branch}` token.
    ///
    /// The database is checked first, so a request missing both reports the
    /// database.
    pub fn db_branch(&self, database: Option<&str>, branch: Option<&str>) -> Result<String> {
        let database = self.resolve_database(database)?;
        let branch = self.resolve_branch(branch)?;
        Ok(db_branch_name(&database, &branch))
    }
}

/// Compose the `{database}:{branch}` token used by data-plane paths.
pub fn db_branch_name(database: &str, branch: &str) -> String {
    format!("{}:{}", database, branch)
}

/// Require a call-site identifier that has no client default (table, record, ...).
pub fn require(identifier: Identifier, value: &str) -> Result<&str> {
    if value.trim().is_empty() {
        Err(Error::missing(identifier))
    } else {
        Ok(value)
    }
}

/// Percent-encode one path segment. `:` is kept so `db:branch` tokens stay readable.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).replace("%3A", ":")
}

fn first_set<'a>(call_site: Option<&'a str>, default: Option<&'a str>) -> Option<&'a str> {
    call_site
        .filter(|v| !v.trim().is_empty())
        .or_else(|| default.filter(|v| !v.trim().is_empty()))
}
