//! `/triggers` endpoints (automated message rules).

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{Trigger, TriggerPayload};

impl ApiGateway {
    pub async fn list_triggers(&self) -> Result<Vec<Trigger>, ClientError> {
        self.get_json(&["triggers"], &[]).await
    }

    pub async fn create_trigger(&self, payload: &TriggerPayload) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &["triggers"], Some(payload)).await
    }

    pub async fn update_trigger(&self, id: &str, payload: &TriggerPayload) -> Result<(), ClientError> {
        self.send_unit(Method::PUT, &["triggers", id], Some(payload)).await
    }

    pub async fn delete_trigger(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &["triggers", id], None).await
    }
}
