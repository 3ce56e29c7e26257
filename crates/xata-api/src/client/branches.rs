use tracing::instrument;

use xata_client::{ErrorMap, Result};

use crate::client::Address;
use crate::database::{
    BranchDetails, BranchList, BranchMetadata, BranchStats, CreateBranchRequest,
    CreateBranchResponse, ResolveBranchResponse, StatusResponse,
};
use crate::migration::{
    ApplyMigrationRequest, MigrationOp, MigrationResponse, SchemaHistoryRequest,
    SchemaHistoryResponse,
};

impl super::XataClient {
    /// List the branches of a database.
    #[instrument(skip(self))]
    pub async fn list_branches(&self, address: &Address) -> Result<BranchList> {
        let url = self.database_url(address, "")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    /// Branch details, including the full schema.
    #[instrument(skip(self))]
    pub async fn get_branch_details(&self, address: &Address) -> Result<BranchDetails> {
        let url = self.branch_url(address, "")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    /// Create a branch, optionally forked from another one of the same database.
    #[instrument(skip(self, request))]
    pub async fn create_branch(
        &self,
        address: &Address,
        request: &CreateBranchRequest,
    ) -> Result<CreateBranchResponse> {
        let url = self.branch_url(address, "")?;
        let builder = self
            .client
            .put(url)
            .query_opt("from", request.from.as_deref())
            .json(request)?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    #[instrument(skip(self))]
    pub async fn delete_branch(&self, address: &Address) -> Result<StatusResponse> {
        let url = self.branch_url(address, "")?;
        self.client
            .dispatch(self.client.delete(url), ErrorMap::WRITE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_branch_metadata(&self, address: &Address) -> Result<BranchMetadata> {
        let url = self.branch_url(address, "/metadata")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    #[instrument(skip(self, metadata))]
    pub async fn update_branch_metadata(
        &self,
        address: &Address,
        metadata: &BranchMetadata,
    ) -> Result<()> {
        let url = self.branch_url(address, "/metadata")?;
        self.client
            .dispatch_empty(self.client.put(url).json(metadata)?, ErrorMap::WRITE)
            .await
    }

    /// Read and write activity of a branch.
    #[instrument(skip(self))]
    pub async fn get_branch_stats(&self, address: &Address) -> Result<BranchStats> {
        let url = self.branch_url(address, "/stats")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    /// Pick the branch to use for a git branch.
    ///
    /// The server maps `git_branch` to a database branch, falling back to
    /// `fallback_branch` and then to `main`. The answer says which rule applied.
    #[instrument(skip(self))]
    pub async fn resolve_branch(
        &self,
        address: &Address,
        git_branch: Option<&str>,
        fallback_branch: Option<&str>,
    ) -> Result<ResolveBranchResponse> {
        let url = self.database_url(address, "/resolveBranch")?;
        let builder = self
            .client
            .get(url)
            .query_opt("gitBranch", git_branch)
            .query_opt("fallbackBranch", fallback_branch);
        self.client.dispatch(builder, ErrorMap::STANDARD).await
    }

    /// Apply schema edits to a branch in one migration.
    #[instrument(skip(self, operations), fields(operations = operations.len()))]
    pub async fn apply_migration(
        &self,
        address: &Address,
        operations: &[MigrationOp],
    ) -> Result<MigrationResponse> {
        let url = self.branch_url(address, "/schema/apply")?;
        let body = ApplyMigrationRequest { operations };
        self.client
            .dispatch(self.client.post(url).json(&body)?, ErrorMap::WRITE)
            .await
    }

    /// Past migrations of a branch, newest first.
    #[instrument(skip(self, request))]
    pub async fn get_schema_history(
        &self,
        address: &Address,
        request: &SchemaHistoryRequest,
    ) -> Result<SchemaHistoryResponse> {
        let url = self.branch_url(address, "/schema/history")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }
}
