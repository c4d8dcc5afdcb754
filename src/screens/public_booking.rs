//! Public booking page: end customers pick services and a free slot, and can
//! reschedule or cancel their upcoming appointment by phone number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::AppState;
use crate::error::{ScreenError, ScreenResult};
use crate::grid;
use crate::messages;
use crate::models::{Appointment, BarberProfile, PublicBookingRequest, PublicCancelRequest, Service};
use crate::phone;
use crate::slots::{self, BusyInterval, SlotCandidate, WorkingHours};

/// Page state carried in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Comma-separated service ids.
    #[serde(default)]
    pub services: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl PublicQuery {
    pub fn service_ids(&self) -> Vec<String> {
        self.services
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The caller's next appointment, with what is needed to reschedule it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingAppointment {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub date: NaiveDate,
    /// `dd.MM.yyyy HH:MM`, local.
    pub starts_at: String,
    pub name: Option<String>,
    pub services_label: String,
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBookingView {
    pub business_id: String,
    pub display_name: String,
    pub shop_name: Option<String>,
    pub booking_enabled: bool,
    /// Shown instead of the form when booking is off.
    pub notice: Option<String>,
    pub services: Vec<Service>,
    pub date: NaiveDate,
    pub selected_service_ids: Vec<String>,
    pub total_duration_minutes: i64,
    pub slots: Vec<SlotCandidate>,
    pub phone: Option<String>,
    pub upcoming: Option<UpcomingAppointment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub service_ids: Vec<String>,
    /// ISO instant of the chosen slot.
    #[serde(default)]
    pub slot: Option<String>,
    /// Set when rescheduling the caller's upcoming appointment.
    #[serde(default)]
    pub existing_appointment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub is_update: bool,
    pub name: String,
    pub services_text: String,
    pub time_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<BookingConfirmation>,
    pub view: PublicBookingView,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelForm {
    pub appointment_id: String,
    pub phone: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

struct ValidBooking {
    name: String,
    phone: String,
    start_time: DateTime<Utc>,
    service_ids: Vec<String>,
    existing_appointment_id: Option<String>,
}

impl BookingForm {
    fn validate(&self) -> ScreenResult<ValidBooking> {
        let name = self.name.trim();
        let phone = phone::normalize_international(&self.phone);
        let start_time = self
            .slot
            .as_deref()
            .and_then(|slot| DateTime::parse_from_rfc3339(slot.trim()).ok())
            .map(|t| t.with_timezone(&Utc));

        match (name.is_empty(), phone, self.service_ids.is_empty(), start_time) {
            (false, Some(phone), false, Some(start_time)) => Ok(ValidBooking {
                name: name.to_string(),
                phone,
                start_time,
                service_ids: self.service_ids.clone(),
                existing_appointment_id: self
                    .existing_appointment_id
                    .clone()
                    .filter(|id| !id.trim().is_empty()),
            }),
            _ => Err(ScreenError::validation(messages::REQUIRED_FIELDS)),
        }
    }
}

fn selected_services<'a>(offered: &'a [Service], ids: &[String]) -> Vec<&'a Service> {
    offered.iter().filter(|s| ids.contains(&s.id)).collect()
}

impl AppState {
    async fn public_profile(&self, business_id: &str) -> ScreenResult<BarberProfile> {
        self.api
            .public_profile(business_id)
            .await
            .map_err(|e| ScreenError::failed("load public profile", messages::BARBER_NOT_FOUND, e))
    }

    /// Day appointments for slot availability; a failed fetch counts as none.
    async fn public_day_appointments(&self, business_id: &str, date: NaiveDate) -> Vec<Appointment> {
        let range = self.zone.range(crate::time_range::RangeMode::Day, date);
        match self.api.public_appointments(business_id, &range).await {
            Ok(list) => list,
            Err(e) => {
                error!(error = %e, business_id, %date, "Failed to load public appointments");
                Vec::new()
            }
        }
    }

    /// The first upcoming appointment booked with `phone`, when it is valid.
    async fn upcoming_for_phone(&self, business_id: &str, phone: Option<&str>) -> Option<UpcomingAppointment> {
        let phone = phone.filter(|p| phone::is_valid_international(p))?;
        let list = match self.api.public_appointments_by_phone(business_id, phone).await {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, business_id, "Upcoming appointment lookup failed");
                return None;
            }
        };
        list.into_iter().next().map(|appointment| UpcomingAppointment {
            id: appointment.id.clone(),
            start_time: appointment.start_time,
            date: self.zone.local_date(&appointment.start_time),
            starts_at: self.zone.datetime_label(&appointment.start_time),
            name: appointment
                .name
                .clone()
                .or_else(|| appointment.customer.as_ref().and_then(|c| c.name.clone())),
            services_label: grid::services_label(&appointment),
            service_ids: appointment.selected_service_ids(),
        })
    }

    /// Resolves the phone for this page: an explicit value is remembered
    /// (or forgotten when invalid); otherwise the remembered one is used.
    fn page_phone(&self, business_id: &str, explicit: Option<&str>) -> Option<String> {
        match explicit.map(str::trim) {
            Some(phone) => {
                self.context().remember_phone(business_id, phone);
                Some(phone.to_string()).filter(|p| !p.is_empty())
            }
            None => self.context().remembered_phone(business_id),
        }
    }

    pub async fn load_public_booking(&self, business_id: &str, query: PublicQuery) -> ScreenResult<PublicBookingView> {
        let profile = self.public_profile(business_id).await?;
        let date = query.date.unwrap_or_else(|| self.today());
        let phone = self.page_phone(business_id, query.phone.as_deref());

        let mut view = PublicBookingView {
            business_id: business_id.to_string(),
            display_name: profile.display_name().to_string(),
            shop_name: profile.shop_name.clone(),
            booking_enabled: profile.online_booking_enabled(),
            notice: None,
            services: Vec::new(),
            date,
            selected_service_ids: Vec::new(),
            total_duration_minutes: 0,
            slots: Vec::new(),
            phone,
            upcoming: None,
        };

        if !profile.online_booking_enabled() {
            view.notice = Some(messages::BOOKING_DISABLED.to_string());
            return Ok(view);
        }

        let requested = query.service_ids();
        let selected = selected_services(&profile.services, &requested);
        let total = slots::total_duration(selected.iter().map(|s| &s.duration_minutes));
        view.selected_service_ids = selected.iter().map(|s| s.id.clone()).collect();
        view.total_duration_minutes = total;

        let (appointments, upcoming) = tokio::join!(
            self.public_day_appointments(business_id, date),
            self.upcoming_for_phone(business_id, view.phone.as_deref()),
        );
        let busy = BusyInterval::from_appointments(&appointments);
        view.slots = self
            .zone
            .slots(date, total, WorkingHours::for_profile(&profile), &busy, self.now());
        view.upcoming = upcoming;
        view.services = profile.services;

        Ok(view)
    }

    /// Books (or reschedules) and returns the refreshed page for the booked day.
    pub async fn book_public(&self, business_id: &str, form: BookingForm) -> ScreenResult<BookingOutcome> {
        let profile = self.public_profile(business_id).await?;
        if !profile.online_booking_enabled() {
            return Err(ScreenError::validation(messages::BOOKING_DISABLED));
        }
        let booking = form.validate()?;

        let request = PublicBookingRequest {
            name: booking.name.clone(),
            phone: booking.phone.clone(),
            start_time: booking.start_time,
            service_ids: booking.service_ids.clone(),
            existing_appointment_id: booking.existing_appointment_id.clone(),
        };
        self.api
            .public_book(business_id, &request)
            .await
            .map_err(|e| ScreenError::failed_with_server_message("public booking", messages::BOOKING_FAILED, e))?;

        let is_update = booking.existing_appointment_id.is_some();
        info!(business_id, start = %booking.start_time, is_update, "Public booking saved");

        let services_text = selected_services(&profile.services, &booking.service_ids)
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let confirmation = BookingConfirmation {
            is_update,
            name: booking.name,
            services_text,
            time_text: self.zone.datetime_label(&booking.start_time),
        };

        let query = PublicQuery {
            date: Some(self.zone.local_date(&booking.start_time)),
            services: None,
            phone: Some(booking.phone),
        };
        let view = self.load_public_booking(business_id, query).await?;

        Ok(BookingOutcome {
            message: if is_update {
                messages::BOOKING_UPDATED
            } else {
                messages::BOOKING_CREATED
            },
            confirmation: Some(confirmation),
            view,
        })
    }

    /// Cancels the caller's appointment and returns the refreshed page.
    pub async fn cancel_public(&self, business_id: &str, form: CancelForm) -> ScreenResult<BookingOutcome> {
        let phone = phone::normalize_international(&form.phone)
            .ok_or_else(|| ScreenError::validation(messages::PHONE_INCOMPLETE))?;
        if form.appointment_id.trim().is_empty() {
            return Err(ScreenError::validation(messages::REQUIRED_FIELDS));
        }

        let request = PublicCancelRequest {
            appointment_id: form.appointment_id.trim().to_string(),
            phone: phone.clone(),
        };
        self.api
            .public_cancel(business_id, &request)
            .await
            .map_err(|e| {
                ScreenError::failed_with_server_message("public cancel", messages::CANCEL_APPOINTMENT_FAILED, e)
            })?;
        info!(business_id, appointment_id = %request.appointment_id, "Public appointment cancelled");

        let query = PublicQuery {
            date: form.date,
            services: None,
            phone: Some(phone),
        };
        Ok(BookingOutcome {
            message: messages::APPOINTMENT_CANCELLED,
            confirmation: None,
            view: self.load_public_booking(business_id, query).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BookingForm {
        BookingForm {
            name: "Aysel".into(),
            phone: "+994501234567".into(),
            service_ids: vec!["s1".into()],
            slot: Some("2024-06-10T06:00:00.000Z".into()),
            existing_appointment_id: Some("".into()),
        }
    }

    #[test]
    fn query_parses_service_list() {
        let query = PublicQuery {
            services: Some("s1, s2,,".into()),
            ..PublicQuery::default()
        };
        assert_eq!(query.service_ids(), vec!["s1", "s2"]);
        assert!(PublicQuery::default().service_ids().is_empty());
    }

    #[test]
    fn complete_form_validates() {
        let booking = form().validate().unwrap();
        assert_eq!(booking.start_time.to_rfc3339(), "2024-06-10T06:00:00+00:00");
        assert!(booking.existing_appointment_id.is_none());
    }

    #[test]
    fn any_missing_field_is_rejected_with_one_message() {
        let cases: Vec<Box<dyn Fn(&mut BookingForm)>> = vec![
            Box::new(|f| f.name = " ".into()),
            Box::new(|f| f.phone = "+99450".into()),
            Box::new(|f| f.service_ids.clear()),
            Box::new(|f| f.slot = None),
            Box::new(|f| f.slot = Some("tomorrow".into())),
        ];
        for mutate in cases {
            let mut f = form();
            mutate(&mut f);
            assert_eq!(f.validate().err().unwrap().user_message(), messages::REQUIRED_FIELDS);
        }
    }

    #[test]
    fn only_offered_services_are_selected() {
        let offered = vec![
            Service { id: "s1".into(), name: "Saç".into(), price: 15.0, duration_minutes: 30 },
            Service { id: "s2".into(), name: "Saqqal".into(), price: 10.0, duration_minutes: 20 },
        ];
        let picked = selected_services(&offered, &["s2".to_string(), "zz".to_string()]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "Saqqal");
    }
}
