//! Error types for the gateway, the screen controllers and the HTTP surface.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::messages;

/// A failed call to the BarberBook API.
///
/// 4xx, 5xx and timeouts are not told apart by callers; `message` carries the
/// server's own explanation when it sent one.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Api {
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("invalid request header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// The backend's `message` field, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Outcome of a failed screen action.
///
/// Cheap to clone so a debounced search can hand the same outcome to every
/// subscriber.
#[derive(Debug, Clone, Error)]
pub enum ScreenError {
    /// Rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// The API call failed; `message` is what the user sees.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: Arc<ClientError>,
    },

    #[error("not signed in")]
    Unauthenticated,
}

impl ScreenError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScreenError::Validation(message.into())
    }

    /// Logs `source` and wraps it with the generic message for this action.
    pub fn failed(action: &str, fallback: &str, source: ClientError) -> Self {
        error!(error = %source, status = ?source.status(), "{action} failed");
        ScreenError::Failed {
            message: fallback.to_string(),
            source: Arc::new(source),
        }
    }

    /// Like [`ScreenError::failed`], preferring the server's own message.
    pub fn failed_with_server_message(action: &str, fallback: &str, source: ClientError) -> Self {
        error!(error = %source, status = ?source.status(), "{action} failed");
        let message = source.server_message().unwrap_or(fallback).to_string();
        ScreenError::Failed {
            message,
            source: Arc::new(source),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ScreenError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScreenError::Failed { .. } => StatusCode::BAD_GATEWAY,
            ScreenError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ScreenError::Unauthenticated => messages::UNAUTHENTICATED.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

impl IntoResponse for ScreenError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.user_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(message: Option<&str>) -> ClientError {
        ClientError::Api {
            status: reqwest::StatusCode::CONFLICT,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn server_message_overrides_fallback_when_present() {
        let err = ScreenError::failed_with_server_message("book", messages::BOOKING_FAILED, api_error(Some("Bu vaxt doludur")));
        assert_eq!(err.user_message(), "Bu vaxt doludur");

        let err = ScreenError::failed_with_server_message("book", messages::BOOKING_FAILED, api_error(Some("  ")));
        assert_eq!(err.user_message(), messages::BOOKING_FAILED);
    }

    #[test]
    fn status_is_known_for_api_errors_only() {
        assert_eq!(api_error(None).status(), Some(reqwest::StatusCode::CONFLICT));
        assert_eq!(ClientError::InvalidUrl("nope".into()).status(), None);

        let err = ScreenError::failed("book", messages::BOOKING_FAILED, api_error(None));
        let ScreenError::Failed { source, .. } = err else {
            panic!("expected a failed outcome");
        };
        assert_eq!(source.status(), Some(reqwest::StatusCode::CONFLICT));
    }

    #[test]
    fn generic_failure_hides_server_detail() {
        let err = ScreenError::failed("save contact", messages::SAVE_CONTACT_FAILED, api_error(Some("duplicate key")));
        assert_eq!(err.user_message(), messages::SAVE_CONTACT_FAILED);
    }

    #[test]
    fn responses_map_to_status_codes() {
        assert_eq!(
            ScreenError::validation("x").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ScreenError::Unauthenticated.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ScreenError::failed("load", "oops", api_error(None)).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
