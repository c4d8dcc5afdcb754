//! GET /dashboard - KPIs and charts (signed in).

use axum::routing::get;
use axum::{Extension, Json, Router};

use super::respond;
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::dashboard::DashboardView;
use crate::screens::AppState;

pub fn router() -> Router {
    Router::new().route("/dashboard", get(show))
}

async fn show(Extension(state): Extension<AppState>) -> ScreenResult<Json<ApiResponse<DashboardView>>> {
    Ok(respond(state.load_dashboard().await?, "Dashboard loaded"))
}
