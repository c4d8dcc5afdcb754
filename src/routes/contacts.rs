//! Contacts routes (signed in).
//!
//! GET  /contacts?q         - Contacts matching q
//! GET  /contacts/search?q  - Search-as-you-type; 204 when superseded by a newer query
//! POST /contacts           - Create a contact
//! PUT  /contacts/{id}      - Update a contact

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;

use super::{respond, settled};
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::contacts::{ContactForm, ContactsView};
use crate::screens::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/contacts", get(list).post(create))
        .route("/contacts/search", get(search))
        .route("/contacts/{id}", put(update))
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn list(
    Extension(state): Extension<AppState>,
    Query(query): Query<SearchQuery>,
) -> ScreenResult<Json<ApiResponse<ContactsView>>> {
    Ok(respond(state.load_contacts(&query.q).await?, "Contacts loaded"))
}

async fn search(Extension(state): Extension<AppState>, Query(query): Query<SearchQuery>) -> Response {
    settled(state.search_contacts(&query.q).await, "Contacts loaded")
}

async fn create(
    Extension(state): Extension<AppState>,
    Json(form): Json<ContactForm>,
) -> ScreenResult<(StatusCode, Json<ApiResponse<ContactsView>>)> {
    let view = state.save_contact(None, form).await?;
    Ok((StatusCode::CREATED, respond(view, "Contact created")))
}

async fn update(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ContactForm>,
) -> ScreenResult<Json<ApiResponse<ContactsView>>> {
    Ok(respond(state.save_contact(Some(&id), form).await?, "Contact updated"))
}
