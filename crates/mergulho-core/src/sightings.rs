//! Wildlife sightings ("avistamentos").
//!
//! Sightings are keyed and ordered by `registro`. The day, month and year a
//! sighting was recorded are stored as text (`"9"`, `"2024"`), while callers
//! filter with integers; the integers are rendered to their decimal string
//! before comparison. The stored representation is left alone.

use serde_json::Value;
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::page::{PageRequest, PageResult};
use crate::traits::DocumentStore;
use crate::types::{Document, Query};
use crate::Result;

/// Collection holding sighting documents.
pub const COLLECTION: &str = "avistamentos";

/// Field every sighting listing is ordered by. Also the document id.
pub const ORDER_FIELD: &str = "registro";

/// Path the sighting listing is served under.
pub const LIST_PATH: &str = "/avistamentos";

pub const DAY_FIELD: &str = "dia_registro";
pub const MONTH_FIELD: &str = "mes_registro";
pub const YEAR_FIELD: &str = "ano_registro";

/// Optional filters on the recorded date of a sighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SightingFilter {
    pub day: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
}

impl SightingFilter {
    fn apply(&self, mut query: Query) -> Query {
        for (field, value) in self.fields() {
            query = query.where_equals(field, Value::String(value.to_string()));
        }
        query
    }

    /// Present filters with their field names, in canonical order.
    fn fields(&self) -> impl Iterator<Item = (&'static str, i64)> {
        [
            (DAY_FIELD, self.day),
            (MONTH_FIELD, self.month),
            (YEAR_FIELD, self.year),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}

fn base_query(filter: &SightingFilter) -> Query {
    filter.apply(Query::collection(COLLECTION).order_by(ORDER_FIELD))
}

/// Fetch one page of sightings matching `filter`, ordered by `registro`.
#[instrument(skip(store))]
pub async fn query_many<S>(
    store: &S,
    page: i64,
    page_size: i64,
    filter: &SightingFilter,
) -> Result<PageResult<Document>>
where
    S: DocumentStore + ?Sized,
{
    let request = PageRequest::new(page, page_size);
    let query = base_query(filter)
        .offset(request.offset())
        .limit(request.page_size());

    let items = store.run_query(&query).await?;
    debug!(returned = items.len(), page = request.page(), "Listed sightings");

    Ok(PageResult::from_items(items, request))
}

/// Count every sighting matching `filter`.
#[instrument(skip(store))]
pub async fn count_many<S>(store: &S, filter: &SightingFilter) -> Result<u64>
where
    S: DocumentStore + ?Sized,
{
    store.count(&base_query(filter)).await
}

/// Link to a page of the sighting listing.
///
/// Parameters always appear as `page`, `page_size`, then whichever of
/// `dia_registro`, `mes_registro`, `ano_registro` are set.
pub fn build_url(page: u64, page_size: u64, filter: &SightingFilter) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("page", &page.to_string());
    params.append_pair("page_size", &page_size.to_string());
    for (field, value) in filter.fields() {
        params.append_pair(field, &value.to_string());
    }
    format!("{}?{}", LIST_PATH, params.finish())
}
