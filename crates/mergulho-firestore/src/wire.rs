//! Request and response bodies of the Firestore v1 REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mergulho_core::types::{FieldFilter, FilterOp, RangeBound};
use mergulho_core::Query;

use crate::value;

/// Alias of the single aggregation a count query asks for.
pub(crate) const COUNT_ALIAS: &str = "count";

/// Quote a field path segment unless it is a simple identifier.
pub(crate) fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldReference {
    field_path: String,
}

impl FieldReference {
    fn new(name: &str) -> Self {
        Self {
            field_path: field_path(name),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Order {
    field: FieldReference,
    direction: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFieldFilter {
    field: FieldReference,
    op: &'static str,
    value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompositeFilter {
    op: &'static str,
    filters: Vec<Filter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Filter {
    FieldFilter(WireFieldFilter),
    CompositeFilter(CompositeFilter),
}

impl From<&FieldFilter> for Filter {
    fn from(filter: &FieldFilter) -> Self {
        let op = match filter.op {
            FilterOp::Equal => "EQUAL",
            FilterOp::Range(RangeBound::AtLeast) => "GREATER_THAN_OR_EQUAL",
            FilterOp::Range(RangeBound::AtMost) => "LESS_THAN_OR_EQUAL",
        };
        Filter::FieldFilter(WireFieldFilter {
            field: FieldReference::new(&filter.field),
            op,
            value: value::encode(&filter.value),
        })
    }
}

/// A `StructuredQuery` over a single collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i32>,
}

fn clamp_i32(n: u64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl From<&Query> for StructuredQuery {
    fn from(query: &Query) -> Self {
        let mut filters: Vec<Filter> = query.filters().iter().map(Filter::from).collect();
        let filter = match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Filter::CompositeFilter(CompositeFilter {
                op: "AND",
                filters,
            })),
        };

        let order_by = query
            .order_field()
            .map(|field| Order {
                field: FieldReference::new(field),
                direction: "ASCENDING",
            })
            .into_iter()
            .collect();

        Self {
            from: vec![CollectionSelector {
                collection_id: query.collection_name().to_string(),
            }],
            filter,
            order_by,
            offset: query.offset_value().map(clamp_i32),
            limit: query.limit_value().map(clamp_i32),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Aggregation {
    alias: &'static str,
    count: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredAggregationQuery {
    structured_query: StructuredQuery,
    aggregations: Vec<Aggregation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunAggregationQueryRequest {
    structured_aggregation_query: StructuredAggregationQuery,
}

impl RunAggregationQueryRequest {
    /// Count the documents matching `query`, ignoring its offset and limit.
    pub fn count(query: &Query) -> Self {
        Self {
            structured_aggregation_query: StructuredAggregationQuery {
                structured_query: StructuredQuery::from(&query.unpaginated()),
                aggregations: vec![Aggregation {
                    alias: COUNT_ALIAS,
                    count: Map::new(),
                }],
            },
        }
    }
}

/// A stored document as returned by the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDocument {
    /// Full resource name, ending in `/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl WireDocument {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Body of a document write.
#[derive(Debug, Serialize)]
pub(crate) struct WriteDocument {
    pub fields: Map<String, Value>,
}

/// One element of the `runQuery` response array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryResponseItem {
    pub document: Option<WireDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AggregationResult {
    #[serde(default)]
    pub aggregate_fields: Map<String, Value>,
}

/// One element of the `runAggregationQuery` response array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunAggregationQueryResponseItem {
    pub result: Option<AggregationResult>,
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub status: Option<String>,
}
