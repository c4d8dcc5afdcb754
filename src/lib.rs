//! # BarberBook Web Client Library
//!
//! Screens of the BarberBook appointment client (calendar, contacts,
//! dashboard, settings, public booking) as JSON view models over the
//! BarberBook API. The router is exposed so integration tests can run the
//! app in-process against a mock backend.

pub mod api;
pub mod config;
pub mod context;
pub mod debounce;
pub mod error;
pub mod grid;
pub mod labels;
pub mod messages;
pub mod models;
pub mod phone;
pub mod routes;
pub mod screens;
pub mod slots;
pub mod time_range;
pub mod zone;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use screens::AppState;

/// Build the Axum router with all route modules and middleware.
///
/// This function does NOT bind a listener or resolve a stored session.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::calendar::router())
        .merge(routes::contacts::router())
        .merge(routes::dashboard::router())
        .merge(routes::settings::router())
        .merge(routes::public::router())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
