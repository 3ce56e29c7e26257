use serde::Serialize;
use tracing::instrument;

use xata_client::{ErrorMap, RequestBuilder, Result};

use crate::client::Address;
use crate::record::{BulkInsertResponse, Record, RecordWriteOptions};
use crate::transaction::{TransactionOperation, TransactionRequest, TransactionResponse};
use crate::values::RecordData;

/// A rejected transaction answers 400 with a per-operation error list rather
/// than the usual error body, so 400 keeps its raw text.
/// See [`TransactionFailure`](crate::TransactionFailure).
const TRANSACTION_ERRORS: ErrorMap = ErrorMap::new(&[401, 404]);

#[derive(Serialize)]
struct BulkInsertRequest<'a> {
    records: &'a [RecordData],
}

impl super::XataClient {
    /// Insert a record with a server-generated id.
    ///
    /// `columns` selects what the returned record carries. Empty returns only
    /// the id and metadata.
    #[instrument(skip(self, data))]
    pub async fn insert_record(
        &self,
        address: &Address,
        table: &str,
        data: &RecordData,
        columns: &[&str],
    ) -> Result<Record> {
        let url = self.table_url(address, table, "/data")?;
        let builder = with_columns(self.client.post(url), columns).json(data)?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Insert a record under a caller-chosen id, replacing any existing one
    /// unless `create_only` is set.
    #[instrument(skip(self, data, options))]
    pub async fn insert_record_with_id(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        data: &RecordData,
        options: &RecordWriteOptions,
    ) -> Result<Record> {
        let url = self.record_url(address, table, id, "")?;
        let builder = with_write_options(self.client.put(url), options).json(data)?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Update a record, creating it if it does not exist.
    #[instrument(skip(self, data, options))]
    pub async fn upsert_record(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        data: &RecordData,
        options: &RecordWriteOptions,
    ) -> Result<Record> {
        let url = self.record_url(address, table, id, "")?;
        let builder = with_write_options(self.client.post(url), options).json(data)?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Update some columns of an existing record.
    #[instrument(skip(self, data, options))]
    pub async fn update_record(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        data: &RecordData,
        options: &RecordWriteOptions,
    ) -> Result<Record> {
        let url = self.record_url(address, table, id, "")?;
        let builder = with_write_options(self.client.patch(url), options).json(data)?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Fetch a record. Empty `columns` returns every column.
    #[instrument(skip(self))]
    pub async fn get_record(
        &self,
        address: &Address,
        table: &str,
        id: &str,
        columns: &[&str],
    ) -> Result<Record> {
        let url = self.record_url(address, table, id, "")?;
        let builder = with_columns(self.client.get(url), columns);
        self.client.dispatch(builder, ErrorMap::STANDARD).await
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, address: &Address, table: &str, id: &str) -> Result<()> {
        let url = self.record_url(address, table, id, "")?;
        self.client
            .dispatch_empty(self.client.delete(url), ErrorMap::STANDARD)
            .await
    }

    /// Insert many records in one call.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn bulk_insert_records(
        &self,
        address: &Address,
        table: &str,
        records: &[RecordData],
        columns: &[&str],
    ) -> Result<BulkInsertResponse> {
        let url = self.table_url(address, table, "/bulk")?;
        let builder = with_columns(self.client.post(url), columns)
            .json(&BulkInsertRequest { records })?;
        self.client.dispatch(builder, ErrorMap::WRITE).await
    }

    /// Run operations atomically on one branch. Results follow request order.
    #[instrument(skip(self, operations), fields(operations = operations.len()))]
    pub async fn branch_transaction(
        &self,
        address: &Address,
        operations: &[TransactionOperation],
    ) -> Result<TransactionResponse> {
        let url = self.branch_url(address, "/transaction")?;
        let body = TransactionRequest { operations };
        self.client
            .dispatch(self.client.post(url).json(&body)?, TRANSACTION_ERRORS)
            .await
    }
}

fn with_columns(builder: RequestBuilder, columns: &[&str]) -> RequestBuilder {
    if columns.is_empty() {
        builder
    } else {
        builder.query("columns", columns.join(","))
    }
}

fn with_write_options(builder: RequestBuilder, options: &RecordWriteOptions) -> RequestBuilder {
    let builder = if options.columns.is_empty() {
        builder
    } else {
        builder.query("columns", options.columns.join(","))
    };
    builder
        .query_opt("createOnly", options.create_only)
        .query_opt("ifVersion", options.if_version)
}
