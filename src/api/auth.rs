//! `/auth` endpoints.

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{AuthResponse, BarberProfile, LoginRequest, ProfileUpdate, SignupRequest};

impl ApiGateway {
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, &["auth", "login"], request).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, &["auth", "signup"], request).await
    }

    /// The profile behind the current token.
    pub async fn me(&self) -> Result<BarberProfile, ClientError> {
        self.get_json(&["auth", "me"], &[]).await
    }

    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<BarberProfile, ClientError> {
        self.send_json(Method::PUT, &["auth", "me"], update).await
    }
}
