//! `/services` endpoints.

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{Service, ServicePayload};

impl ApiGateway {
    pub async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get_json(&["services"], &[]).await
    }

    pub async fn create_service(&self, payload: &ServicePayload) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &["services"], Some(payload)).await
    }

    pub async fn update_service(&self, id: &str, payload: &ServicePayload) -> Result<(), ClientError> {
        self.send_unit(Method::PUT, &["services", id], Some(payload)).await
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &["services", id], None).await
    }
}
