//! # xata-api
//!
//! Typed client for the Xata API.
//!
//! ## Features
//!
//! - **Workspaces and users** - Workspaces, the current user and API keys
//! - **Databases** - Create, rename and delete databases, list regions
//! - **Branches** - Branch lifecycle, metadata, stats and git branch resolution
//! - **Schema** - Tables, columns and migrations
//! - **Records** - Insert, upsert, update, get, delete, bulk insert and transactions
//! - **Files** - Upload, download and delete files in `file` and `file[]` columns
//! - **Search** - Query with filters and cursors, full-text and vector search,
//!   ask, summarize and aggregate
//!
//! Every call resolves its workspace, region, database and branch from the
//! [`Address`] it is given, falling back to the client defaults. A call that
//! cannot resolve an identifier fails before anything is sent.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xata_api::{Address, FilterExpression, QueryRequest, RecordData, XataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xata_api::Error> {
//!     // Key from XATA_API_KEY, .env or ~/.xatarc; defaults from XATA_* variables
//!     let client = XataClient::builder()
//!         .workspace_id("acme-abc123")
//!         .region("eu-west-1")
//!         .database("docs")
//!         .build()?;
//!     let here = Address::new();
//!
//!     // Insert
//!     let mut data = RecordData::new();
//!     data.insert("title".into(), "Hello".into());
//!     data.insert("published".into(), true.into());
//!     let record = client.insert_record(&here, "posts", &data, &[]).await?;
//!
//!     // Get
//!     let fetched = client.get_record(&here, "posts", &record.id, &["title"]).await?;
//!
//!     // Query
//!     let request = QueryRequest::new()
//!         .filter(FilterExpression::new().column("published", true));
//!     let page = client.query_table(&here, "posts", &request).await?;
//!     let next_cursor = page.meta.page.more.then(|| page.meta.page.cursor);
//!
//!     // Delete
//!     client.delete_record(&here, "posts", &record.id).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod database;
pub mod file;
pub mod filter;
pub mod migration;
pub mod record;
pub mod search;
pub mod table;
pub mod transaction;
pub mod values;
pub mod workspace;

// Main client
pub use client::{Address, XataClient, XataClientBuilder};

// Control plane
pub use database::{
    CreateDatabaseRequest, CreateDatabaseResponse, DatabaseList, DatabaseMetadata, DatabaseUi,
    Region, RegionList, StatusResponse,
};
pub use workspace::{
    ApiKeyList, ApiKeySummary, CreatedApiKey, Role, User, UserUpdate, Workspace, WorkspaceList,
    WorkspaceMeta, WorkspaceSummary,
};

// Branches and schema
pub use database::{
    BranchDetails, BranchList, BranchMetadata, BranchStats, BranchSummary, CreateBranchRequest,
    CreateBranchResponse, ResolveBranchResponse,
};
pub use migration::{MigrationOp, MigrationResponse, SchemaHistoryRequest, SchemaHistoryResponse};
pub use table::{Column, ColumnType, Schema, Table, TableSchema};

// Records
pub use file::{FileContent, FileSlot, XataFile};
pub use record::{BulkInsertResponse, Record, RecordWriteOptions, XataMetadata};
pub use transaction::{
    TransactionFailure, TransactionOperation, TransactionResponse, TransactionResult,
};
pub use values::{DataInputValue, InputFile, IntegerOutOfRange, RecordData};

// Query and search
pub use filter::{FilterExpression, FilterPredicate, FilterRangeValue, FilterValue};
pub use search::{
    AggregateRequest, AggregateResponse, AskRequest, AskResponse, BoosterExpression,
    PageConfig, QueryRequest, QueryResponse, SearchBranchRequest, SearchResponse,
    SearchTableRequest, SortExpression, SummarizeRequest, SummarizeResponse, TargetExpression,
    VectorSearchRequest,
};

// Re-export xata-client types that users might need
pub use xata_client::{
    ApiErrorBody, ClientConfig, ClientConfigBuilder, Defaults, Error, ErrorKind, ErrorMap,
    Identifier, Result, RetryConfig,
};
