//! Gateway to the BarberBook API.
//!
//! One `reqwest::Client` shared by every screen. Each request carries the
//! bearer token currently held by the [`AppContext`] and the fixed tunnelling
//! header from configuration. Endpoint methods live in the submodules, one per
//! backend resource.

pub mod appointments;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod public;
pub mod services;
pub mod triggers;

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::ClientError;

#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base: Url,
    tunnel_header: Option<(HeaderName, HeaderValue)>,
    context: Arc<AppContext>,
}

/// Error body shape the backend uses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiGateway {
    pub fn new(config: &AppConfig, context: Arc<AppContext>) -> Result<Self, ClientError> {
        let base = Url::parse(&config.api_base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.api_base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.api_base_url.clone()));
        }

        let tunnel_header = match &config.tunnel_header {
            Some((name, value)) => {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|e| ClientError::InvalidHeader(format!("{value}: {e}")))?;
                Some((name, value))
            }
            None => None,
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.api_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            tunnel_header,
            context,
        })
    }

    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Base URL joined with `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let url = self.url(segments)?;
        debug!(%method, %url, "API request");

        let mut request = self.http.request(method, url);
        if let Some((name, value)) = &self.tunnel_header {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(token) = self.context.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(request)
    }

    /// Sends and fails on any non-2xx status, keeping the server's `message`.
    async fn dispatch(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        debug!(%status, ?message, "API error response");
        Err(ClientError::Api { status, message })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let request = self.request(Method::GET, segments)?.query(query);
        Self::decode(Self::dispatch(request).await?).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.request(method, segments)?.json(body);
        Self::decode(Self::dispatch(request).await?).await
    }

    /// For calls whose response body the client ignores.
    pub(crate) async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        let mut request = self.request(method, segments)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::dispatch(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> ApiGateway {
        let config = AppConfig {
            api_base_url: base.to_string(),
            ..AppConfig::default()
        };
        ApiGateway::new(&config, Arc::new(AppContext::in_memory())).unwrap()
    }

    #[test]
    fn urls_append_escaped_segments() {
        let api = gateway("http://localhost:5000/api");
        assert_eq!(
            api.url(&["public", "barbers", "a b/c"]).unwrap().as_str(),
            "http://localhost:5000/api/public/barbers/a%20b%2Fc"
        );

        let api = gateway("http://localhost:5000/api/");
        assert_eq!(api.url(&["auth", "me"]).unwrap().as_str(), "http://localhost:5000/api/auth/me");
    }

    #[test]
    fn requests_carry_token_and_tunnel_header() {
        let api = gateway("http://localhost:5000/api");
        api.context().set_token("secret");

        let request = api.request(Method::GET, &["auth", "me"]).unwrap().build().unwrap();
        let headers = request.headers();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
        assert_eq!(headers.get("ngrok-skip-browser-warning").unwrap(), "true");
    }

    #[test]
    fn anonymous_requests_have_no_authorization() {
        let api = gateway("http://localhost:5000/api");
        let request = api.request(Method::GET, &["public", "barbers", "b1"]).unwrap().build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn rejects_unusable_configuration() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            ApiGateway::new(&config, Arc::new(AppContext::in_memory())),
            Err(ClientError::InvalidUrl(_))
        ));

        let config = AppConfig {
            tunnel_header: Some(("bad header".to_string(), "x".to_string())),
            ..AppConfig::default()
        };
        assert!(matches!(
            ApiGateway::new(&config, Arc::new(AppContext::in_memory())),
            Err(ClientError::InvalidHeader(_))
        ));
    }
}
