//! Settings routes (signed in).
//!
//! GET    /settings                       - Profile form, services, triggers, public link
//! PUT    /settings/profile               - Save the business profile
//! POST   /settings/services              - Add a service
//! PUT    /settings/services/{id}         - Edit a service
//! DELETE /settings/services/{id}         - Remove a service
//! POST   /settings/triggers              - Add a message trigger
//! POST   /settings/triggers/{id}/toggle  - Enable/disable a trigger
//! DELETE /settings/triggers/{id}         - Remove a trigger

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};

use super::respond;
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::settings::{ProfileForm, ServiceForm, SettingsView, TriggerForm};
use crate::screens::AppState;

type SettingsResponse = ScreenResult<Json<ApiResponse<SettingsView>>>;

pub fn router() -> Router {
    Router::new()
        .route("/settings", get(show))
        .route("/settings/profile", put(save_profile))
        .route("/settings/services", post(create_service))
        .route("/settings/services/{id}", put(update_service).delete(delete_service))
        .route("/settings/triggers", post(create_trigger))
        .route("/settings/triggers/{id}/toggle", post(toggle_trigger))
        .route("/settings/triggers/{id}", delete(delete_trigger))
}

async fn show(Extension(state): Extension<AppState>) -> SettingsResponse {
    Ok(respond(state.load_settings().await?, "Settings loaded"))
}

async fn save_profile(Extension(state): Extension<AppState>, Json(form): Json<ProfileForm>) -> SettingsResponse {
    Ok(respond(state.save_profile(form).await?, "Profile saved"))
}

async fn create_service(
    Extension(state): Extension<AppState>,
    Json(form): Json<ServiceForm>,
) -> ScreenResult<(StatusCode, Json<ApiResponse<SettingsView>>)> {
    let view = state.save_service(None, form).await?;
    Ok((StatusCode::CREATED, respond(view, "Service created")))
}

async fn update_service(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ServiceForm>,
) -> SettingsResponse {
    Ok(respond(state.save_service(Some(&id), form).await?, "Service updated"))
}

async fn delete_service(Extension(state): Extension<AppState>, Path(id): Path<String>) -> SettingsResponse {
    Ok(respond(state.delete_service(&id).await?, "Service deleted"))
}

async fn create_trigger(
    Extension(state): Extension<AppState>,
    Json(form): Json<TriggerForm>,
) -> ScreenResult<(StatusCode, Json<ApiResponse<SettingsView>>)> {
    let view = state.create_trigger(form).await?;
    Ok((StatusCode::CREATED, respond(view, "Trigger created")))
}

async fn toggle_trigger(Extension(state): Extension<AppState>, Path(id): Path<String>) -> SettingsResponse {
    Ok(respond(state.toggle_trigger(&id).await?, "Trigger updated"))
}

async fn delete_trigger(Extension(state): Extension<AppState>, Path(id): Path<String>) -> SettingsResponse {
    Ok(respond(state.delete_trigger(&id).await?, "Trigger deleted"))
}
