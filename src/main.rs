//! # BarberBook Web Client
//!
//! Serves the BarberBook screens as JSON view models over the external
//! BarberBook API.
//!
//! ## Architecture
//!
//! - Axum handles HTTP routing and request/response lifecycle
//! - One reqwest gateway talks to the BarberBook API with the stored token
//! - Client storage (token, theme, remembered phones) lives in a JSON file

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use barberbook_web::config::AppConfig;
use barberbook_web::context::{AppContext, FileStore};
use barberbook_web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barberbook_web=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting BarberBook web client");

    let config = AppConfig::from_env();
    info!(api = %config.api_base_url, zone = ?config.zone, "Configuration loaded");

    let store = FileStore::open(&config.storage_path)
        .with_context(|| format!("opening client storage at {}", config.storage_path.display()))?;
    let context = Arc::new(AppContext::new(Arc::new(store)));
    let state = AppState::new(&config, context).context("building API gateway")?;

    // Restore a stored session before serving
    let session = state.resolve_session().await;
    if session.authenticated {
        info!("Signed-in session restored");
    } else {
        warn!("No signed-in session; authenticated screens answer 401 until login");
    }

    let app = create_app(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
