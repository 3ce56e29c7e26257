use tracing::instrument;

use xata_client::{encode_segment, require, ErrorMap, Identifier, Result};

use crate::client::Address;
use crate::file::{FileContent, FileSlot, XataFile};

const OCTET_STREAM: &str = "application/octet-stream";

impl super::XataClient {
    /// Download a file stored in a `file` or `file[]` column.
    #[instrument(skip(self))]
    pub async fn get_file(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        column: &str,
        slot: FileSlot<'_>,
    ) -> Result<FileContent> {
        let url = self.file_url(address, table, id, column, slot)?;
        let builder = self.client.get(url).header("Accept", "*/*");
        let (data, content_type) = self.client.dispatch_bytes(builder, ErrorMap::STANDARD).await?;
        Ok(FileContent { data, content_type })
    }

    /// Upload file content, replacing what the slot held.
    ///
    /// Content without a media type uploads as `application/octet-stream`.
    #[instrument(skip(self, content), fields(size = content.data.len()))]
    pub async fn put_file(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        column: &str,
        slot: FileSlot<'_>,
        content: FileContent,
    ) -> Result<XataFile> {
        let url = self.file_url(address, table, id, column, slot)?;
        let content_type = content
            .content_type
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        let builder = self.client.put(url).bytes(content.data, content_type);
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Remove a file. Returns the metadata of the deleted file.
    #[instrument(skip(self))]
    pub async fn delete_file(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        column: &str,
        slot: FileSlot<'_>,
    ) -> Result<XataFile> {
        let url = self.file_url(address, table, id, column, slot)?;
        self.client
            .dispatch(self.client.delete(url), ErrorMap::STANDARD)
            .await
    }

    fn file_url(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        column: &str,
        slot: FileSlot<'_>,
    ) -> Result<String> {
        let column = require(Identifier::Column, column)?;
        let suffix = match slot {
            FileSlot::Single => format!("/column/{}/file", encode_segment(column)),
            FileSlot::Item(file_id) => {
                let file_id = require(Identifier::File, file_id)?;
                format!(
                    "/column/{}/file/{}",
                    encode_segment(column),
                    encode_segment(file_id)
                )
            }
        };
        self.record_url(address, table, id, &suffix)
    }
}
