//! Session routes.
//!
//! GET  /session         - Current session (restores a stored token)
//! POST /session/login   - Sign in with the local phone form
//! POST /session/signup  - Create an account
//! POST /session/logout  - Sign out
//! PUT  /session/theme   - Persist the light/dark preference

use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;

use super::respond;
use crate::context::Theme;
use crate::error::ScreenResult;
use crate::models::ApiResponse;
use crate::screens::session::{LoginForm, SessionView, SignupForm};
use crate::screens::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/session", get(current))
        .route("/session/login", post(login))
        .route("/session/signup", post(signup))
        .route("/session/logout", post(logout))
        .route("/session/theme", put(set_theme))
}

#[derive(Debug, Deserialize)]
struct ThemeRequest {
    theme: Theme,
}

async fn current(Extension(state): Extension<AppState>) -> Json<ApiResponse<SessionView>> {
    respond(state.resolve_session().await, "Session resolved")
}

async fn login(
    Extension(state): Extension<AppState>,
    Json(form): Json<LoginForm>,
) -> ScreenResult<Json<ApiResponse<SessionView>>> {
    Ok(respond(state.login(form).await?, "Signed in"))
}

async fn signup(
    Extension(state): Extension<AppState>,
    Json(form): Json<SignupForm>,
) -> ScreenResult<Json<ApiResponse<SessionView>>> {
    Ok(respond(state.signup(form).await?, "Account created"))
}

async fn logout(Extension(state): Extension<AppState>) -> Json<ApiResponse<SessionView>> {
    respond(state.logout(), "Signed out")
}

async fn set_theme(
    Extension(state): Extension<AppState>,
    Json(req): Json<ThemeRequest>,
) -> Json<ApiResponse<SessionView>> {
    respond(state.set_theme(req.theme), "Theme saved")
}
