//! Calendar routes (signed in).
//!
//! GET  /calendar?view&date&nav                     - Day or week grid
//! GET  /calendar/customers?q                       - Debounced customer lookup for the form
//! POST /calendar/appointments                      - Create an appointment
//! GET  /calendar/appointments/{id}?view&date       - Appointment with edit-form defaults
//! PUT  /calendar/appointments/{id}                 - Update an appointment
//! POST /calendar/appointments/{id}/cancel?view&date - Cancel an appointment

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{respond, settled};
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::calendar::{AppointmentDetails, AppointmentForm, CalendarCursor, CalendarView, Nav};
use crate::screens::AppState;
use crate::time_range::RangeMode;

pub fn router() -> Router {
    Router::new()
        .route("/calendar", get(show))
        .route("/calendar/customers", get(lookup_customers))
        .route("/calendar/appointments", post(create))
        .route("/calendar/appointments/{id}", get(details).put(update))
        .route("/calendar/appointments/{id}/cancel", post(cancel))
}

#[derive(Debug, Default, Deserialize)]
struct CalendarQuery {
    #[serde(default)]
    view: RangeMode,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    nav: Option<Nav>,
}

impl CalendarQuery {
    fn cursor(&self, state: &AppState) -> CalendarCursor {
        let today = state.today();
        let cursor = CalendarCursor::new(self.view, self.date.unwrap_or(today));
        match self.nav {
            Some(nav) => cursor.navigate(nav, today),
            None => cursor,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn show(
    Extension(state): Extension<AppState>,
    Query(query): Query<CalendarQuery>,
) -> ScreenResult<Json<ApiResponse<CalendarView>>> {
    let view = state.load_calendar(query.cursor(&state)).await?;
    Ok(respond(view, "Calendar loaded"))
}

async fn lookup_customers(Extension(state): Extension<AppState>, Query(query): Query<SearchQuery>) -> Response {
    if let Err(e) = state.require_profile() {
        return e.into_response();
    }
    settled(state.lookup_customers(&query.q).await, "Customers found")
}

async fn create(
    Extension(state): Extension<AppState>,
    Json(form): Json<AppointmentForm>,
) -> ScreenResult<(StatusCode, Json<ApiResponse<CalendarView>>)> {
    let view = state.save_appointment(None, form).await?;
    Ok((StatusCode::CREATED, respond(view, "Appointment created")))
}

async fn details(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<ApiResponse<AppointmentDetails>>, Response> {
    match state.appointment_details(&id, query.cursor(&state)).await {
        Ok(Some(details)) => Ok(respond(details, "Appointment retrieved")),
        Ok(None) => Err(StatusCode::NOT_FOUND.into_response()),
        Err(e) => Err(e.into_response()),
    }
}

async fn update(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(form): Json<AppointmentForm>,
) -> ScreenResult<Json<ApiResponse<CalendarView>>> {
    let view = state.save_appointment(Some(&id), form).await?;
    Ok(respond(view, "Appointment updated"))
}

async fn cancel(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> ScreenResult<Json<ApiResponse<CalendarView>>> {
    let view = state.cancel_appointment(&id, query.cursor(&state)).await?;
    Ok(respond(view, "Appointment cancelled"))
}
