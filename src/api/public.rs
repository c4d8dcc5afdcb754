//! Unauthenticated `/public/barbers/{id}` endpoints behind the booking page.

use reqwest::Method;

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::{Appointment, BarberProfile, PublicBookingRequest, PublicCancelRequest};
use crate::time_range::TimeRange;

impl ApiGateway {
    /// Public profile, including the services offered online.
    pub async fn public_profile(&self, business_id: &str) -> Result<BarberProfile, ClientError> {
        self.get_json(&["public", "barbers", business_id], &[]).await
    }

    /// Appointments in `range`, used to mark taken slots.
    pub async fn public_appointments(
        &self,
        business_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.get_json(&["public", "barbers", business_id, "appointments"], &range.query())
            .await
    }

    /// Upcoming appointments booked with `phone`, soonest first.
    pub async fn public_appointments_by_phone(
        &self,
        business_id: &str,
        phone: &str,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.get_json(
            &["public", "barbers", business_id, "appointments"],
            &[("phone", phone.to_string())],
        )
        .await
    }

    pub async fn public_book(&self, business_id: &str, request: &PublicBookingRequest) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &["public", "barbers", business_id, "book"], Some(request))
            .await
    }

    pub async fn public_cancel(&self, business_id: &str, request: &PublicCancelRequest) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &["public", "barbers", business_id, "cancel"], Some(request))
            .await
    }
}
