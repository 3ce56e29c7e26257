use tracing::instrument;

use xata_client::{encode_segment, require, ErrorMap, Identifier, Result};

use crate::database::{
    CreateDatabaseRequest, CreateDatabaseResponse, DatabaseList, DatabaseMetadata, DatabaseUi,
    RegionList, RenameDatabaseRequest, UpdateDatabaseRequest,
};

impl super::XataClient {
    /// List the databases of a workspace.
    #[instrument(skip(self))]
    pub async fn list_databases(&self, workspace: Option<&str>) -> Result<DatabaseList> {
        let url = self.workspace_path(workspace, "/dbs")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Create a database in a region.
    #[instrument(skip(self, request))]
    pub async fn create_database(
        &self,
        workspace: Option<&str>,
        database: &str,
        request: &CreateDatabaseRequest,
    ) -> Result<CreateDatabaseResponse> {
        let url = self.database_path(workspace, database, "")?;
        self.client
            .dispatch(self.client.put(url).json(request)?, ErrorMap::WRITE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_database(
        &self,
        workspace: Option<&str>,
        database: &str,
    ) -> Result<DatabaseMetadata> {
        let url = self.database_path(workspace, database, "")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Delete a database and all of its branches.
    #[instrument(skip(self))]
    pub async fn delete_database(&self, workspace: Option<&str>, database: &str) -> Result<()> {
        let url = self.database_path(workspace, database, "")?;
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Change the UI settings of a database.
    #[instrument(skip(self))]
    pub async fn update_database(
        &self,
        workspace: Option<&str>,
        database: &str,
        ui: &DatabaseUi,
    ) -> Result<DatabaseMetadata> {
        let url = self.database_path(workspace, database, "")?;
        let body = UpdateDatabaseRequest { ui };
        self.client
            .dispatch(self.client.patch(url).json(&body)?, ErrorMap::CONTROL_PLANE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn rename_database(
        &self,
        workspace: Option<&str>,
        database: &str,
        new_name: &str,
    ) -> Result<DatabaseMetadata> {
        let url = self.database_path(workspace, database, "/rename")?;
        let new_name = require(Identifier::Database, new_name)?;
        let body = RenameDatabaseRequest { new_name };
        self.client
            .dispatch(self.client.post(url).json(&body)?, ErrorMap::WRITE)
            .await
    }

    /// Regions available to a workspace.
    #[instrument(skip(self))]
    pub async fn list_regions(&self, workspace: Option<&str>) -> Result<RegionList> {
        let url = self.workspace_path(workspace, "/regions")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// `{control plane}/workspaces/{workspace}/dbs/{database}{suffix}`.
    fn database_path(&self, workspace: Option<&str>, database: &str, suffix: &str) -> Result<String> {
        let database = self.defaults().resolve_database(Some(database))?;
        self.workspace_path(
            workspace,
            &format!("/dbs/{}{}", encode_segment(&database), suffix),
        )
    }
}
