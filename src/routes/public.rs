//! Public booking routes (no sign-in).
//!
//! GET  /b/{business_id}?date&services&phone - Booking page (alias: /book/{business_id})
//! POST /b/{business_id}/book                - Book or reschedule
//! POST /b/{business_id}/cancel              - Cancel an upcoming appointment

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use super::respond;
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::public_booking::{BookingForm, BookingOutcome, CancelForm, PublicBookingView, PublicQuery};
use crate::screens::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/b/{business_id}", get(show))
        .route("/book/{business_id}", get(show))
        .route("/b/{business_id}/book", post(book))
        .route("/b/{business_id}/cancel", post(cancel))
}

async fn show(
    Extension(state): Extension<AppState>,
    Path(business_id): Path<String>,
    Query(query): Query<PublicQuery>,
) -> ScreenResult<Json<ApiResponse<PublicBookingView>>> {
    let view = state.load_public_booking(&business_id, query).await?;
    Ok(respond(view, "Booking page loaded"))
}

async fn book(
    Extension(state): Extension<AppState>,
    Path(business_id): Path<String>,
    Json(form): Json<BookingForm>,
) -> ScreenResult<(StatusCode, Json<ApiResponse<BookingOutcome>>)> {
    let outcome = state.book_public(&business_id, form).await?;
    let message = outcome.message;
    Ok((StatusCode::CREATED, respond(outcome, message)))
}

async fn cancel(
    Extension(state): Extension<AppState>,
    Path(business_id): Path<String>,
    Json(form): Json<CancelForm>,
) -> ScreenResult<Json<ApiResponse<BookingOutcome>>> {
    let outcome = state.cancel_public(&business_id, form).await?;
    let message = outcome.message;
    Ok(respond(outcome, message))
}
