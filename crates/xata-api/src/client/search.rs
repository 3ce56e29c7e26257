use tracing::instrument;

use xata_client::{ErrorMap, Result};

use crate::client::Address;
use crate::search::{
    AggregateRequest, AggregateResponse, AskRequest, AskResponse, QueryRequest, QueryResponse,
    SearchBranchRequest, SearchResponse, SearchTableRequest, SummarizeRequest,
    SummarizeResponse, VectorSearchRequest,
};

impl super::XataClient {
    /// Filter, sort and page through a table.
    #[instrument(skip(self, request))]
    pub async fn query_table(
        &self,
        address: &Address,
        table: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse> {
        let url = self.table_url(address, table, "/query")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    /// Free-text search over the tables of a branch.
    #[instrument(skip(self, request))]
    pub async fn search_branch(
        &self,
        address: &Address,
        request: &SearchBranchRequest,
    ) -> Result<SearchResponse> {
        let url = self.branch_url(address, "/search")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    /// Free-text search within one table.
    #[instrument(skip(self, request))]
    pub async fn search_table(
        &self,
        address: &Address,
        table: &str,
        request: &SearchTableRequest,
    ) -> Result<SearchResponse> {
        let url = self.table_url(address, table, "/search")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    #[instrument(skip(self, request), fields(column = %request.column))]
    pub async fn vector_search(
        &self,
        address: &Address,
        table: &str,
        request: &VectorSearchRequest,
    ) -> Result<SearchResponse> {
        let url = self.table_url(address, table, "/vectorSearch")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    /// Ask a question answered from the table's records.
    #[instrument(skip(self, request))]
    pub async fn ask_table(
        &self,
        address: &Address,
        table: &str,
        request: &AskRequest,
    ) -> Result<AskResponse> {
        let url = self.table_url(address, table, "/ask")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn summarize_table(
        &self,
        address: &Address,
        table: &str,
        request: &SummarizeRequest,
    ) -> Result<SummarizeResponse> {
        let url = self.table_url(address, table, "/summarize")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn aggregate_table(
        &self,
        address: &Address,
        table: &str,
        request: &AggregateRequest,
    ) -> Result<AggregateResponse> {
        let url = self.table_url(address, table, "/aggregate")?;
        self.client
            .dispatch(self.client.post(url).json(request)?, ErrorMap::STANDARD)
            .await
    }
}
