//! Telemetry routes.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use serde_json::{Value, json};

use mergulho_core::telemetry::{self, TelemetryFilter, parse_date_param};

use super::AppState;
use super::error::ApiError;
use super::html::{self, Listing};
use super::negotiate::wants_json;
use super::params::TelemetryParams;

/// GET /telemetria
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TelemetryParams>,
) -> Result<Response, ApiError> {
    let filter = TelemetryFilter {
        oid: params.oid().map(str::to_string),
        date_start: parse_date_param(params.date_start.as_deref(), false),
        date_end: parse_date_param(params.date_end.as_deref(), true),
    };

    if params.list.count() {
        let count = telemetry::count_many(state.store.as_ref(), &filter).await?;
        return Ok(Json(json!({ "count": count })).into_response());
    }

    let result = telemetry::query_many(
        state.store.as_ref(),
        params.list.page(),
        params.list.page_size(),
        &filter,
    )
    .await?;

    if wants_json(params.list.format.as_deref(), &headers) {
        let items: Vec<Value> = result
            .items
            .into_iter()
            .map(|doc| Value::Object(doc.into_fields()))
            .collect();
        return Ok(Json(json!({
            "page": result.page,
            "page_size": result.page_size,
            "count": items.len(),
            "items": items,
        }))
        .into_response());
    }

    let link = |page: u64| {
        telemetry::build_url(
            page,
            result.page_size,
            params.oid(),
            params.date_start.as_deref(),
            params.date_end.as_deref(),
        )
    };
    let listing = Listing {
        items: &result.items,
        page: result.page,
        page_size: result.page_size,
        prev_url: result.prev_page().map(link),
        next_url: result.next_page().map(link),
    };
    let page = html::telemetry_list(
        &listing,
        params.oid(),
        params.date_start.as_deref(),
        params.date_end.as_deref(),
    );
    Ok(Html(page).into_response())
}
