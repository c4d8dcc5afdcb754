//! Domain models for the BarberBook web client.
//!
//! These structs mirror the JSON shapes returned by the BarberBook API. The
//! client never owns these records; it holds render-scoped copies only.
//! Field names follow the backend (camelCase, MongoDB `_id`).

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::time_range::iso_millis;

/// Length assumed for an appointment that carries no explicit end.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 30;

// ============================================================================
// API Models (Deserialize from backend JSON)
// ============================================================================

/// Appointment status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Active,
    Cancelled,
}

/// The customer reference embedded in an appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A service line selected on an appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentService {
    #[serde(default, alias = "_id")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub services: Vec<AppointmentService>,
    /// Customer name on the public lookup-by-phone shape.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_ids: Option<Vec<String>>,
}

impl Appointment {
    /// End timestamp if present, else start + 30 minutes.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time
            .unwrap_or_else(|| self.start_time + Duration::minutes(DEFAULT_APPOINTMENT_MINUTES))
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }

    /// Whole minutes between start and effective end when positive, else the default.
    pub fn duration_minutes(&self) -> i64 {
        let minutes = (self.effective_end() - self.start_time).num_minutes();
        if minutes > 0 {
            minutes
        } else {
            DEFAULT_APPOINTMENT_MINUTES
        }
    }

    /// Service ids selected on this appointment, from whichever shape the backend sent.
    pub fn selected_service_ids(&self) -> Vec<String> {
        if let Some(ids) = self.service_ids.as_ref().filter(|ids| !ids.is_empty()) {
            return ids.clone();
        }
        self.services
            .iter()
            .filter_map(|s| s.service_id.clone())
            .collect()
    }
}

/// A customer contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub last_visit_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A service offered by the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
}

/// The business ("barber") profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarberProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub default_duration: Option<i64>,
    #[serde(default)]
    pub work_day_start_minutes: Option<i64>,
    #[serde(default)]
    pub work_day_end_minutes: Option<i64>,
    #[serde(default)]
    pub booking_disabled: bool,
    /// Only present on the public profile lookup.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl BarberProfile {
    pub fn online_booking_enabled(&self) -> bool {
        !self.booking_disabled
    }

    /// Name shown in headers: personal name first, shop name otherwise.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.shop_name.as_deref())
            .unwrap_or_default()
    }
}

/// When an automated message fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    BeforeAppointment,
    AfterLastVisit,
}

/// An automated-message rule owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TriggerType,
    #[serde(default)]
    pub offset_minutes: Option<i64>,
    #[serde(default)]
    pub offset_days: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub active: bool,
}

/// One weekday bucket of the dashboard's weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    pub count: u32,
}

/// One UTC hour bucket of the dashboard's busiest-hours chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: u32,
}

/// Aggregates served by `/dashboard/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub today_appointments: u32,
    #[serde(default)]
    pub week_appointments: u32,
    #[serde(default)]
    pub total_customers: u32,
    #[serde(default)]
    pub returning_clients: u32,
    #[serde(default)]
    pub returning_rate: f64,
    #[serde(default)]
    pub weekly_appointments: Vec<DayCount>,
    #[serde(default)]
    pub recency_buckets: BTreeMap<String, u32>,
    #[serde(default)]
    pub top_hours: Vec<HourCount>,
}

/// Token plus profile returned by login and signup.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub barber: BarberProfile,
}

// ============================================================================
// Request Models (Serialize to backend JSON)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub shop_name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub shop_name: String,
    pub phone: String,
    pub default_duration: i64,
    pub work_day_start_minutes: i64,
    pub work_day_end_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    #[serde(serialize_with = "iso_millis::serialize")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerPayload {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    pub name: String,
    pub price: f64,
    pub duration_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    #[serde(rename = "type")]
    pub kind: TriggerType,
    pub message: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBookingRequest {
    pub name: String,
    pub phone: String,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub start_time: DateTime<Utc>,
    pub service_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_appointment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCancelRequest {
    pub appointment_id: String,
    pub phone: String,
}

// ============================================================================
// Response Models
// ============================================================================

/// Generic response wrapper for the client's own HTTP surface.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn appointment_without_end_defaults_to_thirty_minutes() {
        let appt: Appointment = serde_json::from_value(json!({
            "_id": "a1",
            "startTime": "2024-06-10T09:00:00.000Z",
            "status": "active"
        }))
        .unwrap();

        assert_eq!(appt.effective_end().to_rfc3339(), "2024-06-10T09:30:00+00:00");
        assert_eq!(appt.duration_minutes(), 30);
    }

    #[test]
    fn duration_is_the_actual_length_when_positive() {
        let short: Appointment = serde_json::from_value(json!({
            "_id": "a2",
            "startTime": "2024-06-10T09:00:00Z",
            "endTime": "2024-06-10T09:15:00Z"
        }))
        .unwrap();
        assert_eq!(short.duration_minutes(), 15);

        let inverted: Appointment = serde_json::from_value(json!({
            "_id": "a3",
            "startTime": "2024-06-10T09:00:00Z",
            "endTime": "2024-06-10T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(inverted.duration_minutes(), DEFAULT_APPOINTMENT_MINUTES);
    }

    #[test]
    fn appointment_parses_embedded_customer_and_services() {
        let appt: Appointment = serde_json::from_value(json!({
            "_id": "a2",
            "startTime": "2024-06-10T09:00:00Z",
            "endTime": "2024-06-10T10:30:00Z",
            "status": "cancelled",
            "customer": { "_id": "c1", "name": "Elvin", "phone": "+994501234567" },
            "services": [
                { "serviceId": "s1", "name": "Saç", "price": 15, "durationMinutes": 60 },
                { "_id": "s2", "name": "Saqqal", "price": 10, "durationMinutes": 30 }
            ]
        }))
        .unwrap();

        assert!(appt.is_cancelled());
        assert_eq!(appt.duration_minutes(), 90);
        assert_eq!(appt.selected_service_ids(), vec!["s1", "s2"]);
        assert_eq!(appt.customer.unwrap().name.as_deref(), Some("Elvin"));
    }

    #[test]
    fn explicit_service_ids_win_over_embedded_services() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": "a3",
            "startTime": "2024-06-10T09:00:00Z",
            "serviceIds": ["x"],
            "services": [{ "serviceId": "y", "name": "Y" }]
        }))
        .unwrap();

        assert_eq!(appt.id, "a3");
        assert_eq!(appt.selected_service_ids(), vec!["x"]);
    }

    #[test]
    fn trigger_payload_omits_unused_offset() {
        let payload = TriggerPayload {
            kind: TriggerType::AfterLastVisit,
            message: "Salam {name}".into(),
            active: true,
            offset_minutes: None,
            offset_days: Some(14),
        };
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["type"], "after_last_visit");
        assert_eq!(value["offsetDays"], 14);
        assert!(value.get("offsetMinutes").is_none());
    }

    #[test]
    fn booking_request_sends_millisecond_instants() {
        let request = PublicBookingRequest {
            name: "Aysel".into(),
            phone: "+994501234567".into(),
            start_time: "2024-06-10T06:00:00Z".parse().unwrap(),
            service_ids: vec!["s1".into()],
            existing_appointment_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["startTime"], "2024-06-10T06:00:00.000Z");
        assert_eq!(value["serviceIds"], json!(["s1"]));
        assert!(value.get("existingAppointmentId").is_none());
    }

    #[test]
    fn profile_accepts_either_id_shape() {
        let profile: BarberProfile =
            serde_json::from_value(json!({ "_id": "b1", "shopName": "Kəsim" })).unwrap();

        assert_eq!(profile.id, "b1");
        assert_eq!(profile.display_name(), "Kəsim");
        assert!(profile.online_booking_enabled());
    }
}
