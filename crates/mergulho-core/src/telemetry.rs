//! Tag telemetry ("telemetria").
//!
//! Each document is one position fix of a tagged animal: `oid` identifies
//! the deployment (many fixes share it), `date` is integer epoch seconds.
//! Listings are ordered by `date`.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::page::{PageRequest, PageResult};
use crate::traits::DocumentStore;
use crate::types::{Document, Query, RangeBound};
use crate::Result;

/// Collection holding telemetry documents.
pub const COLLECTION: &str = "telemetria";

/// Field every telemetry listing is ordered and range-filtered by.
pub const ORDER_FIELD: &str = "date";

/// Path the telemetry listing is served under.
pub const LIST_PATH: &str = "/telemetria";

pub const OID_FIELD: &str = "oid";

/// Optional telemetry filters. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryFilter {
    pub oid: Option<String>,
    pub date_start: Option<i64>,
    pub date_end: Option<i64>,
}

impl TelemetryFilter {
    fn apply(&self, mut query: Query) -> Query {
        if let Some(oid) = &self.oid {
            query = query.where_equals(OID_FIELD, Value::String(oid.clone()));
        }
        if let Some(start) = self.date_start {
            query = query.where_range(ORDER_FIELD, RangeBound::AtLeast, Value::from(start));
        }
        if let Some(end) = self.date_end {
            query = query.where_range(ORDER_FIELD, RangeBound::AtMost, Value::from(end));
        }
        query
    }
}

fn base_query(filter: &TelemetryFilter) -> Query {
    filter.apply(Query::collection(COLLECTION).order_by(ORDER_FIELD))
}

/// Fetch one page of telemetry matching `filter`, ordered by `date`.
#[instrument(skip(store))]
pub async fn query_many<S>(
    store: &S,
    page: i64,
    page_size: i64,
    filter: &TelemetryFilter,
) -> Result<PageResult<Document>>
where
    S: DocumentStore + ?Sized,
{
    let request = PageRequest::new(page, page_size);
    let query = base_query(filter)
        .offset(request.offset())
        .limit(request.page_size());

    let items = store.run_query(&query).await?;
    debug!(returned = items.len(), page = request.page(), "Listed telemetry");

    Ok(PageResult::from_items(items, request))
}

/// Count every telemetry document matching `filter`.
#[instrument(skip(store))]
pub async fn count_many<S>(store: &S, filter: &TelemetryFilter) -> Result<u64>
where
    S: DocumentStore + ?Sized,
{
    store.count(&base_query(filter)).await
}

/// Link to a page of the telemetry listing.
///
/// Parameters always appear as `page`, `page_size`, then whichever of
/// `oid`, `date_start`, `date_end` are set. Dates are echoed as given, so a
/// calendar date typed into the filter form survives navigation.
pub fn build_url(
    page: u64,
    page_size: u64,
    oid: Option<&str>,
    date_start: Option<&str>,
    date_end: Option<&str>,
) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("page", &page.to_string());
    params.append_pair("page_size", &page_size.to_string());
    for (name, value) in [
        ("oid", oid),
        ("date_start", date_start),
        ("date_end", date_end),
    ] {
        if let Some(value) = value {
            params.append_pair(name, value);
        }
    }
    format!("{}?{}", LIST_PATH, params.finish())
}

/// Interpret a date bound typed by a user.
///
/// An integer is taken as epoch seconds. Otherwise a `YYYY-MM-DD` date is
/// taken at 00:00:00 UTC, or at 23:59:59 UTC when it closes the range
/// (`is_end`). Blank or unparseable input means no bound.
pub fn parse_date_param(text: Option<&str>, is_end: bool) -> Option<i64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(epoch) = text.parse::<i64>() {
        return Some(epoch);
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let time = if is_end {
        date.and_hms_opt(23, 59, 59)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(time.and_utc().timestamp())
}
