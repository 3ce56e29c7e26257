use tracing::instrument;

use xata_client::{encode_segment, require, ErrorMap, Identifier, Result};

use crate::workspace::{ApiKeyList, CreatedApiKey, User, UserUpdate};

impl super::XataClient {
    /// The user owning the API key.
    #[instrument(skip(self))]
    pub async fn get_user(&self) -> Result<User> {
        let url = self.client.control_url("/user");
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User> {
        let url = self.client.control_url("/user");
        self.client
            .dispatch(self.client.put(url).json(update)?, ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Delete the user owning the API key.
    #[instrument(skip(self))]
    pub async fn delete_user(&self) -> Result<()> {
        let url = self.client.control_url("/user");
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_api_keys(&self) -> Result<ApiKeyList> {
        let url = self.client.control_url("/user/keys");
        self.client
            .dispatch(self.client.get(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    /// Create a named API key. The returned key is not retrievable later.
    #[instrument(skip(self))]
    pub async fn create_api_key(&self, name: &str) -> Result<CreatedApiKey> {
        let url = self.key_url(name)?;
        self.client
            .dispatch(self.client.post(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_api_key(&self, name: &str) -> Result<()> {
        let url = self.key_url(name)?;
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::CONTROL_PLANE)
            .await
    }

    fn key_url(&self, name: &str) -> Result<String> {
        let name = require(Identifier::ApiKey, name)?;
        Ok(self
            .client
            .control_url(&format!("/user/keys/{}", encode_segment(name))))
    }
}
