//! Query, search, vector search, ask, summarize and aggregate types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::{FilterExpression, FilterValue};
use crate::record::Record;

/// Read consistency for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consistency {
    Strong,
    Eventual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
    Random,
}

/// One sort key: `{"column": "asc"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortExpression(pub BTreeMap<String, SortOrder>);

impl SortExpression {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self(BTreeMap::from([(column.into(), order)]))
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }
}

/// Cursor or offset pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl PageConfig {
    pub fn size(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct QueryMeta {
    pub page: PageMeta,
}

/// Body of a table query.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortExpression) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn page(mut self, page: PageConfig) -> Self {
        self.page = Some(page);
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub records: Vec<Record>,
    pub meta: QueryMeta,
}

/// A column to search, optionally weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedColumn {
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Search target: a column name or a weighted column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TargetExpression {
    Column(String),
    Weighted(WeightedColumn),
}

xata_client::impl_polymorphic!(
    TargetExpression,
    "TargetExpression",
    [Column(String), Weighted(WeightedColumn)]
);

impl TargetExpression {
    pub fn weighted(column: impl Into<String>, weight: f64) -> Self {
        Self::Weighted(WeightedColumn {
            column: column.into(),
            weight: Some(weight),
        })
    }
}

impl From<&str> for TargetExpression {
    fn from(column: &str) -> Self {
        Self::Column(column.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBooster {
    pub column: String,
    pub value: FilterValue,
    pub factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_matches_filter: Option<FilterExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericBooster {
    pub column: String,
    pub factor: f64,
    /// `none`, `log`, `log1p`, `ln`, `ln1p`, `square`, `sqrt` or `reciprocal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_matches_filter: Option<FilterExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBooster {
    pub column: String,
    /// RFC 3339 date the decay is measured from. Defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Duration such as `10d` or `1h`.
    pub scale: String,
    pub decay: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_matches_filter: Option<FilterExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValueBoosterExpression {
    pub value_booster: ValueBooster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumericBoosterExpression {
    pub numeric_booster: NumericBooster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DateBoosterExpression {
    pub date_booster: DateBooster,
}

/// Relevance booster for search and ask.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoosterExpression {
    Value(ValueBoosterExpression),
    Numeric(NumericBoosterExpression),
    Date(DateBoosterExpression),
}

xata_client::impl_polymorphic!(
    BoosterExpression,
    "BoosterExpression",
    [
        Value(ValueBoosterExpression),
        Numeric(NumericBoosterExpression),
        Date(DateBoosterExpression),
    ]
);

impl BoosterExpression {
    pub fn value(column: impl Into<String>, value: impl Into<FilterValue>, factor: f64) -> Self {
        Self::Value(ValueBoosterExpression {
            value_booster: ValueBooster {
                column: column.into(),
                value: value.into(),
                factor,
                if_matches_filter: None,
            },
        })
    }

    pub fn numeric(column: impl Into<String>, factor: f64) -> Self {
        Self::Numeric(NumericBoosterExpression {
            numeric_booster: NumericBooster {
                column: column.into(),
                factor,
                modifier: None,
                if_matches_filter: None,
            },
        })
    }

    pub fn date(column: impl Into<String>, scale: impl Into<String>, decay: f64) -> Self {
        Self::Date(DateBoosterExpression {
            date_booster: DateBooster {
                column: column.into(),
                origin: None,
                scale: scale.into(),
                decay,
                factor: None,
                if_matches_filter: None,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encode_html: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMode {
    Phrase,
    Disabled,
}

/// Per-table settings of a branch-wide search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchTableSpec {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<TargetExpression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boosters: Vec<BoosterExpression>,
}

/// Table entry of a branch-wide search: a table name or detailed settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchTable {
    Name(String),
    Detailed(SearchTableSpec),
}

xata_client::impl_polymorphic!(
    SearchTable,
    "SearchTable",
    [Name(String), Detailed(SearchTableSpec)]
);

impl From<&str> for SearchTable {
    fn from(table: &str) -> Self {
        Self::Name(table.to_string())
    }
}

/// Search across every table of a branch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchBranchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<SearchTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PrefixMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
}

impl SearchBranchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Search within one table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchTableRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<TargetExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PrefixMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boosters: Vec<BoosterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
}

impl SearchTableRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn fuzziness(mut self, fuzziness: u8) -> Self {
        self.fuzziness = Some(fuzziness);
        self
    }

    pub fn target(mut self, target: impl Into<TargetExpression>) -> Self {
        self.target.push(target.into());
        self
    }

    pub fn booster(mut self, booster: BoosterExpression) -> Self {
        self.boosters.push(booster);
        self
    }

    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub records: Vec<Record>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimilarityFunction {
    CosineSimilarity,
    L1,
    L2,
}

/// Nearest-neighbour search over a vector column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSearchRequest {
    pub query_vector: Vec<f64>,
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_function: Option<SimilarityFunction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
}

impl VectorSearchRequest {
    pub fn new(column: impl Into<String>, query_vector: Vec<f64>) -> Self {
        Self {
            query_vector,
            column: column.into(),
            similarity_function: None,
            size: None,
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskSearchType {
    Keyword,
    Vector,
}

/// Natural-language question answered from table contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_type: Option<AskSearchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<TargetExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boosters: Vec<BoosterExpression>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,
    /// Ids of the records the answer was drawn from.
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Group-by summaries over a table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    /// Group-by columns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Output name to summary, e.g. `{"total": {"count": "*"}}`.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub summaries: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummarizeResponse {
    pub summaries: Vec<Map<String, Value>>,
}

/// Aggregations over a table, e.g. `{"total": {"count": "*"}}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpression>,
    pub aggs: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateResponse {
    pub aggs: Map<String, Value>,
}
