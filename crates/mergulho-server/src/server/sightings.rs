//! Sighting routes.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::{Value, json};
use tracing::{debug, info};

use mergulho_core::sightings::{self, COLLECTION};
use mergulho_core::{Document, Error, Fields};

use super::AppState;
use super::error::ApiError;
use super::html::{self, Listing};
use super::negotiate::wants_json;
use super::params::{FormatParams, SightingParams};

const NOT_FOUND: &str = "Avistamento não encontrado";

async fn load(state: &AppState, registro: &str) -> Result<Document, ApiError> {
    state
        .store
        .get(COLLECTION, registro)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// Report a missing sighting the same way on every route.
fn missing_sighting(err: Error) -> ApiError {
    if err.is_not_found() {
        ApiError::not_found(NOT_FOUND)
    } else {
        ApiError::from(err)
    }
}

/// GET /avistamentos
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SightingParams>,
) -> Result<Response, ApiError> {
    let filter = params.filter();

    if params.list.count() {
        let count = sightings::count_many(state.store.as_ref(), &filter).await?;
        return Ok(Json(json!({ "count": count })).into_response());
    }

    let result = sightings::query_many(
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

    let listing = Listing {
        items: &result.items,
        page: result.page,
        page_size: result.page_size,
        prev_url: result
            .prev_page()
            .map(|p| sightings::build_url(p, result.page_size, &filter)),
        next_url: result
            .next_page()
            .map(|p| sightings::build_url(p, result.page_size, &filter)),
    };
    Ok(Html(html::sightings_list(&listing, filter.day, filter.month, filter.year)).into_response())
}

/// GET /avistamentos/{registro}
pub async fn view(
    State(state): State<AppState>,
    Path(registro): Path<String>,
    headers: HeaderMap,
    Query(params): Query<FormatParams>,
) -> Result<Response, ApiError> {
    let doc = load(&state, &registro).await?;
    let image_url = state.image_url(&registro);

    if wants_json(params.format.as_deref(), &headers) {
        let mut body = doc.into_fields();
        body.insert("image_url".to_string(), image_url.map(Value::String).unwrap_or(Value::Null));
        return Ok(Json(Value::Object(body)).into_response());
    }

    Ok(Html(html::sighting_view(&registro, &doc.fields, image_url.as_deref())).into_response())
}

/// GET /avistamentos/{registro}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Path(registro): Path<String>,
) -> Result<Html<String>, ApiError> {
    let doc = load(&state, &registro).await?;
    Ok(Html(html::sighting_edit(&registro, &doc.fields)))
}

/// PUT /avistamentos/{registro}
///
/// Merges the JSON body into the sighting.
pub async fn update(
    State(state): State<AppState>,
    Path(registro): Path<String>,
    headers: HeaderMap,
    Query(params): Query<FormatParams>,
    Json(body): Json<Fields>,
) -> Result<Response, ApiError> {
    state
        .store
        .update(COLLECTION, &registro, body)
        .await
        .map_err(missing_sighting)?;
    info!(%registro, "Updated sighting");

    if wants_json(params.format.as_deref(), &headers) {
        let doc = load(&state, &registro).await?;
        return Ok(Json(json!({
            "message": "Avistamento atualizado com sucesso",
            "avistamento": doc.fields,
        }))
        .into_response());
    }

    Ok(Redirect::to(&html::sighting_path(&registro)).into_response())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

/// Form fields worth writing: not `registro`, not blank, not `None`.
fn form_updates(body: &[u8]) -> Fields {
    url::form_urlencoded::parse(body)
        .filter(|(name, value)| name != "registro" && !value.is_empty() && value != "None")
        .map(|(name, value)| (name.into_owned(), Value::String(value.into_owned())))
        .collect()
}

/// POST /avistamentos/{registro}
///
/// A JSON body creates or replaces the sighting. A form body (the edit
/// page) merges its non-blank fields and redirects to the sighting.
pub async fn submit(
    State(state): State<AppState>,
    Path(registro): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if is_json(&headers) {
        let fields: Fields = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("invalid JSON object: {}", e)))?;
        state.store.set(COLLECTION, &registro, fields.clone()).await?;
        info!(%registro, "Stored sighting");

        return Ok(Json(json!({
            "message": "Avistamento criado com sucesso",
            "avistamento": fields,
        }))
        .into_response());
    }

    let updates = form_updates(&body);
    if updates.is_empty() {
        load(&state, &registro).await?;
        debug!(%registro, "Form had nothing to update");
    } else {
        state
            .store
            .update(COLLECTION, &registro, updates)
            .await
            .map_err(missing_sighting)?;
        info!(%registro, "Updated sighting from form");
    }

    Ok(Redirect::to(&html::sighting_path(&registro)).into_response())
}

/// DELETE /avistamentos/{registro}
pub async fn delete(
    State(state): State<AppState>,
    Path(registro): Path<String>,
    headers: HeaderMap,
    Query(params): Query<FormatParams>,
) -> Result<Response, ApiError> {
    load(&state, &registro).await?;
    state.store.delete(COLLECTION, &registro).await?;
    info!(%registro, "Deleted sighting");

    if wants_json(params.format.as_deref(), &headers) {
        return Ok(Json(json!({
            "message": "Avistamento deletado com sucesso",
            "registro": registro,
        }))
        .into_response());
    }

    Ok(Redirect::to(sightings::LIST_PATH).into_response())
}

/// POST /avistamentos/{registro}/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(registro): Path<String>,
) -> Result<Redirect, ApiError> {
    load(&state, &registro).await?;
    state.store.delete(COLLECTION, &registro).await?;
    info!(%registro, "Deleted sighting from form");

    Ok(Redirect::to(sightings::LIST_PATH))
}
