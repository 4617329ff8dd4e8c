//! Structured collection queries.

use serde_json::Value;

/// Which side of a range a filter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// `field >= value`
    AtLeast,
    /// `field <= value`
    AtMost,
}

/// Comparison applied by a field filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `field == value`, type-strict.
    Equal,
    /// Inclusive range bound.
    Range(RangeBound),
}

/// A single predicate on a document field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

/// A query over one collection.
///
/// Results are always ascending by the ordering field; documents lacking
/// that field are not returned. All filters must hold (AND).
///
/// ```
/// use mergulho_core::{Query, RangeBound};
/// use serde_json::json;
///
/// let query = Query::collection("telemetria")
///     .order_by("date")
///     .where_equals("oid", json!("shark-7"))
///     .where_range("date", RangeBound::AtLeast, json!(1_700_000_000))
///     .offset(20)
///     .limit(10);
///
/// assert_eq!(query.filters().len(), 2);
/// assert_eq!(query.offset_value(), Some(20));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    order_by: Option<String>,
    filters: Vec<FieldFilter>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl Query {
    /// Start a query over a collection.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            order_by: None,
            filters: Vec::new(),
            offset: None,
            limit: None,
        }
    }

    /// Order results ascending by a field.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Require `field == value`.
    pub fn where_equals(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            op: FilterOp::Equal,
            value,
        });
        self
    }

    /// Require `field >= value` or `field <= value`.
    pub fn where_range(mut self, field: impl Into<String>, bound: RangeBound, value: Value) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            op: FilterOp::Range(bound),
            value,
        });
        self
    }

    /// Skip the first `n` matching documents.
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Return at most `n` documents.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// The same query with offset and limit removed, as used for counting.
    pub fn unpaginated(&self) -> Self {
        Self {
            offset: None,
            limit: None,
            ..self.clone()
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn order_field(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }
}
