//! `/customers` endpoints.

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{Customer, CustomerPayload};

impl ApiGateway {
    /// Contacts matching `query`; an empty query lists everyone.
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, ClientError> {
        self.get_json(&["customers"], &[("q", query.to_string())]).await
    }

    pub async fn create_customer(&self, payload: &CustomerPayload) -> Result<Customer, ClientError> {
        self.send_json(Method::POST, &["customers"], payload).await
    }

    pub async fn update_customer(&self, id: &str, payload: &CustomerPayload) -> Result<(), ClientError> {
        self.send_unit(Method::PUT, &["customers", id], Some(payload)).await
    }
}
