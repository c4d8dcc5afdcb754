//! `/appointments` endpoints.

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{Appointment, AppointmentPayload};
use crate::time_range::TimeRange;

impl ApiGateway {
    pub async fn list_appointments(&self, range: &TimeRange) -> Result<Vec<Appointment>, ClientError> {
        self.get_json(&["appointments"], &range.query()).await
    }

    pub async fn create_appointment(&self, payload: &AppointmentPayload) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &["appointments"], Some(payload)).await
    }

    pub async fn update_appointment(&self, id: &str, payload: &AppointmentPayload) -> Result<(), ClientError> {
        self.send_unit(Method::PUT, &["appointments", id], Some(payload)).await
    }

    pub async fn cancel_appointment(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::PATCH, &["appointments", id, "cancel"], None).await
    }
}
