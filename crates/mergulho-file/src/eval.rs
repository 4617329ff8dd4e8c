//! In-process query evaluation.
//!
//! Values order by type class first (null < boolean < number < string <
//! array < map), then by value within the class. Equality never crosses
//! type classes, so `"2024"` and `2024` are different values, and a range
//! bound only matches values of its own class.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use mergulho_core::types::{FieldFilter, FilterOp, RangeBound};
use mergulho_core::{Document, Query};

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

/// Total order over stored values.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare_values(l, r))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => {
            let mut left: Vec<_> = x.iter().collect();
            let mut right: Vec<_> = y.iter().collect();
            left.sort_by(|l, r| l.0.cmp(r.0));
            right.sort_by(|l, r| l.0.cmp(r.0));
            left.iter()
                .zip(right.iter())
                .map(|(l, r)| l.0.cmp(r.0).then_with(|| compare_values(l.1, r.1)))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| left.len().cmp(&right.len()))
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn matches(filter: &FieldFilter, document: &Document) -> bool {
    let Some(value) = document.get(&filter.field) else {
        return false;
    };
    if type_rank(value) != type_rank(&filter.value) {
        return false;
    }

    let ordering = compare_values(value, &filter.value);
    match filter.op {
        FilterOp::Equal => ordering.is_eq(),
        FilterOp::Range(RangeBound::AtLeast) => ordering.is_ge(),
        FilterOp::Range(RangeBound::AtMost) => ordering.is_le(),
    }
}

/// Apply a query to every document of its collection.
pub(crate) fn execute(query: &Query, documents: Vec<Document>) -> Vec<Document> {
    let mut selected: Vec<Document> = documents
        .into_iter()
        .filter(|doc| query.filters().iter().all(|f| matches(f, doc)))
        .collect();

    match query.order_field() {
        Some(field) => {
            selected.retain(|doc| doc.get(field).is_some());
            selected.sort_by(|a, b| {
                let (Some(x), Some(y)) = (a.get(field), b.get(field)) else {
                    return Ordering::Equal;
                };
                compare_values(x, y).then_with(|| a.id.cmp(&b.id))
            });
        }
        None => selected.sort_by(|a, b| a.id.cmp(&b.id)),
    }

    let offset = query.offset_value().unwrap_or(0);
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = query
        .limit_value()
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .unwrap_or(usize::MAX);

    selected.into_iter().skip(offset).take(limit).collect()
}
