use tracing::instrument;

use xata_client::{ErrorMap, Result};

use crate::workspace::{Workspace, WorkspaceList, WorkspaceMeta};

impl super::XataClient {
    /// List the workspaces the key can access.
    #[instrument(skip(self))]
    pub async fn list_workspaces(&self) -> Result<WorkspaceList> {
        let url = self.client.control_url("/workspaces");
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Create a workspace. The caller becomes its owner.
    #[instrument(skip(self))]
    pub async fn create_workspace(&self, meta: &WorkspaceMeta) -> Result<Workspace> {
        let url = self.client.control_url("/workspaces");
        self.client
            .dispatch(self.client.post(url).json(meta)?, ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Get a workspace. `None` uses the default workspace.
    #[instrument(skip(self))]
    pub async fn get_workspace(&self, workspace: Option<&str>) -> Result<Workspace> {
        let url = self.workspace_path(workspace, "")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Rename a workspace or change its slug.
    #[instrument(skip(self))]
    pub async fn update_workspace(
        &self,
        workspace: Option<&str>,
        meta: &WorkspaceMeta,
    ) -> Result<Workspace> {
        let url = self.workspace_path(workspace, "")?;
        self.client
            .dispatch(self.client.put(url).json(meta)?, ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Delete a workspace and everything in it.
    #[instrument(skip(self))]
    pub async fn delete_workspace(&self, workspace: Option<&str>) -> Result<()> {
        let url = self.workspace_path(workspace, "")?;
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::CONTROL_PLANE)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::client_for;
    use crate::workspace::{Role, WorkspaceMeta};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_workspaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces"))
            .and(header("Authorization", "Bearer xau_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workspaces": [
                {"id": "ws-1", "name": "Acme", "slug": "acme", "role": "maintainer"}
            ]})))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server).list_workspaces().await.unwrap();
        assert_eq!(list.workspaces.len(), 1);
        assert_eq!(list.workspaces[0].role, Role::Maintainer);
    }

    #[tokio::test]
    async fn test_create_workspace_sends_meta() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces"))
            .and(body_json(json!({"name": "Acme", "slug": "acme"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "acme-abc123", "name": "Acme", "slug": "acme", "memberCount": 1
            })))
            .mount(&server)
            .await;

        let ws = client_for(&server)
            .create_workspace(&WorkspaceMeta::new("Acme").with_slug("acme"))
            .await
            .unwrap();
        assert_eq!(ws.id, "acme-abc123");
        assert_eq!(ws.member_count, Some(1));
    }

    #[tokio::test]
    async fn test_get_workspace_uses_default_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces/ws-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "ws-1", "name": "Acme"})),
            )
            .mount(&server)
            .await;

        let ws = client_for(&server).get_workspace(None).await.unwrap();
        assert_eq!(ws.name, "Acme");
    }

    #[tokio::test]
    async fn test_delete_workspace_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/workspaces/other"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"message": "only owners can delete"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete_workspace(Some("other"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.api_body().unwrap().message, "only owners can delete");
    }
}
