//! HTTP route modules for the BarberBook web client.
//!
//! Each module exposes one screen over JSON:
//! - `health`: liveness check
//! - `session`: login, signup, logout, theme
//! - `calendar`: day/week grid and appointment form
//! - `contacts`: customer list, search and form
//! - `dashboard`: KPIs and charts
//! - `settings`: profile, services, triggers
//! - `public`: customer-facing booking page

pub mod calendar;
pub mod contacts;
pub mod dashboard;
pub mod health;
pub mod public;
pub mod session;
pub mod settings;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::ScreenResult;
use crate::models::ApiResponse;

pub(crate) fn respond<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        data,
        message: message.to_string(),
    })
}

/// Result of a debounced search: `204 No Content` when superseded.
pub(crate) fn settled<T: Serialize>(outcome: Option<ScreenResult<T>>, message: &str) -> Response {
    match outcome {
        Some(Ok(data)) => respond(data, message).into_response(),
        Some(Err(e)) => e.into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
