use tracing::instrument;

use xata_client::{encode_segment, require, ErrorMap, Identifier, Result};

use crate::client::Address;
use crate::migration::MigrationResponse;
use crate::table::{Column, CreateTableResponse, RenameRequest, TableSchema};

impl super::XataClient {
    /// Create an empty table.
    #[instrument(skip(self))]
    pub async fn create_table(&self, address: &Address, table: &str) -> Result<CreateTableResponse> {
        let url = self.table_url(address, table, "")?;
        self.client
            .dispatch(self.client.put(url), ErrorMap::WRITE)
            .await
    }

    /// Delete a table and all of its records.
    #[instrument(skip(self))]
    pub async fn delete_table(&self, address: &Address, table: &str) -> Result<()> {
        let url = self.table_url(address, table, "")?;
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::STANDARD)
            .await
    }

    #[instrument(skip(self))]
    pub async fn rename_table(
        &self,
        address: &Address,
        table: &str,
        new_name: &str,
    ) -> Result<MigrationResponse> {
        let url = self.table_url(address, table, "")?;
        let name = require(Identifier::Table, new_name)?;
        self.client
            .dispatch(
                self.client.patch(url).json(&RenameRequest { name })?,
                ErrorMap::WRITE,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_table_schema(&self, address: &Address, table: &str) -> Result<TableSchema> {
        let url = self.table_url(address, table, "/schema")?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    /// Replace the column set of a table.
    #[instrument(skip(self, schema))]
    pub async fn set_table_schema(
        &self,
        address: &Address,
        table: &str,
        schema: &TableSchema,
    ) -> Result<MigrationResponse> {
        let url = self.table_url(address, table, "/schema")?;
        self.client
            .dispatch(self.client.put(url).json(schema)?, ErrorMap::WRITE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_table_columns(&self, address: &Address, table: &str) -> Result<Vec<Column>> {
        let url = self.table_url(address, table, "/columns")?;
        let schema: TableSchema = self
            .client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await?;
        Ok(schema.columns)
    }

    #[instrument(skip(self, column), fields(column = %column.name, column_type = %column.column_type))]
    pub async fn add_table_column(
        &self,
        address: &Address,
        table: &str,
        column: &Column,
    ) -> Result<MigrationResponse> {
        let url = self.table_url(address, table, "/columns")?;
        self.client
            .dispatch(self.client.post(url).json(column)?, ErrorMap::WRITE)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_column(&self, address: &Address, table: &str, column: &str) -> Result<Column> {
        let url = self.column_url(address, table, column)?;
        self.client
            .dispatch(self.client.get(url), ErrorMap::STANDARD)
            .await
    }

    /// Rename a column. Nested columns use dotted paths, e.g. `address.city`.
    #[instrument(skip(self))]
    pub async fn rename_column(
        &self,
        address: &Address,
        table: &str,
        column: &str,
        new_name: &str,
    ) -> Result<MigrationResponse> {
        let url = self.column_url(address, table, column)?;
        let name = require(Identifier::Column, new_name)?;
        self.client
            .dispatch(
                self.client.patch(url).json(&RenameRequest { name })?,
                ErrorMap::WRITE,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_column(
        &self,
        address: &Address,
        table: &str,
        column: &str,
    ) -> Result<MigrationResponse> {
        let url = self.column_url(address, table, column)?;
        self.client
            .dispatch(self.client.delete(url), ErrorMap::WRITE)
            .await
    }

    fn column_url(&self, address: &Address, table: &str, column: &str) -> Result<String> {
        let column = require(Identifier::Column, column)?;
        self.table_url(
            address,
            table,
            &format!("/columns/{}", encode_segment(column)),
        )
    }
}
