//! Calendar screen: the day/week grid and the appointment form.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::AppState;
use crate::error::{ScreenError, ScreenResult};
use crate::grid::{self, DayGrid, WeekGrid};
use crate::labels;
use crate::messages;
use crate::models::{Appointment, AppointmentPayload, Customer, CustomerPayload, DEFAULT_APPOINTMENT_MINUTES};
use crate::phone;
use crate::slots::WorkingHours;
use crate::time_range::RangeMode;

/// Durations offered by the appointment form, in minutes.
pub const DURATION_CHOICES: [i64; 6] = [15, 30, 45, 60, 120, 240];

/// Toolbar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nav {
    Prev,
    Next,
    Today,
}

/// Which span the calendar shows and the date it is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCursor {
    pub view: RangeMode,
    pub date: NaiveDate,
}

impl CalendarCursor {
    pub fn new(view: RangeMode, date: NaiveDate) -> Self {
        Self { view, date }
    }

    fn step(&self) -> Duration {
        match self.view {
            RangeMode::Day => Duration::days(1),
            RangeMode::Week => Duration::days(7),
        }
    }

    pub fn prev(self) -> Self {
        Self {
            date: self.date - self.step(),
            ..self
        }
    }

    pub fn next(self) -> Self {
        Self {
            date: self.date + self.step(),
            ..self
        }
    }

    pub fn navigate(self, nav: Nav, today: NaiveDate) -> Self {
        match nav {
            Nav::Prev => self.prev(),
            Nav::Next => self.next(),
            Nav::Today => Self { date: today, ..self },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CalendarGrid {
    Day(DayGrid),
    Week(WeekGrid),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub cursor: CalendarCursor,
    pub range_from: String,
    pub range_to: String,
    pub grid: CalendarGrid,
    /// Raw appointments of the range, for detail panels.
    pub appointments: Vec<Appointment>,
}

/// A customer to create together with the appointment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone_digits: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentForm {
    pub date: NaiveDate,
    /// Local start time, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub new_customer: Option<NewCustomer>,
    /// Cursor to reload after saving; defaults to the appointment's day.
    #[serde(default)]
    pub view: Option<RangeMode>,
}

/// Prefilled form values for editing an existing appointment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFormDefaults {
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: i64,
    pub customer_id: Option<String>,
}

/// An appointment plus the form values to edit it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub form: AppointmentFormDefaults,
    pub services_label: String,
}

enum CustomerChoice {
    Existing(String),
    Create(CustomerPayload),
}

impl AppointmentForm {
    fn duration(&self) -> i64 {
        self.duration_minutes
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_APPOINTMENT_MINUTES)
    }

    /// Checks everything that can be checked without the network.
    fn validate(&self) -> ScreenResult<(i64, CustomerChoice)> {
        let start_minutes =
            labels::parse_hm(&self.time).ok_or_else(|| ScreenError::validation(messages::TIME_INVALID))?;

        if let Some(id) = self.customer_id.as_deref().filter(|id| !id.trim().is_empty()) {
            return Ok((start_minutes, CustomerChoice::Existing(id.to_string())));
        }
        let Some(new_customer) = &self.new_customer else {
            return Err(ScreenError::validation(messages::CUSTOMER_REQUIRED));
        };
        if new_customer.name.trim().is_empty() {
            return Err(ScreenError::validation(messages::CUSTOMER_NAME_REQUIRED));
        }
        let digits = phone::local_digits(&new_customer.phone_digits);
        if !phone::is_complete_local(&digits) {
            return Err(ScreenError::validation(messages::LOCAL_PHONE_INCOMPLETE));
        }
        Ok((
            start_minutes,
            CustomerChoice::Create(CustomerPayload {
                name: new_customer.name.trim().to_string(),
                phone: phone::to_international(&digits),
                note: None,
            }),
        ))
    }
}

impl AppState {
    /// Loads the grid for `cursor`.
    ///
    /// A failed fetch is logged and rendered as an empty calendar.
    pub async fn load_calendar(&self, cursor: CalendarCursor) -> ScreenResult<CalendarView> {
        let profile = self.require_profile()?;
        let hours = WorkingHours::for_profile(&profile);
        let range = self.zone.range(cursor.view, cursor.date);

        let appointments = match self.api.list_appointments(&range).await {
            Ok(list) => list,
            Err(e) => {
                error!(error = %e, "Failed to load appointments");
                Vec::new()
            }
        };

        let grid = match cursor.view {
            RangeMode::Day => CalendarGrid::Day(self.zone.day_grid(cursor.date, hours, &appointments)),
            RangeMode::Week => CalendarGrid::Week(self.zone.week_grid(cursor.date, hours, &appointments)),
        };

        Ok(CalendarView {
            cursor,
            range_from: range.from_iso(),
            range_to: range.to_iso(),
            grid,
            appointments,
        })
    }

    /// Form values for editing `appointment`, derived on the local clock.
    pub fn appointment_form_defaults(&self, appointment: &Appointment) -> AppointmentFormDefaults {
        AppointmentFormDefaults {
            date: self.zone.local_date(&appointment.start_time),
            time: self.zone.hm_label(&appointment.start_time),
            duration_minutes: appointment.duration_minutes(),
            customer_id: appointment
                .customer
                .as_ref()
                .map(|c| c.id.clone())
                .filter(|id| !id.is_empty()),
        }
    }

    /// Finds `appointment_id` within the range of `cursor`.
    pub async fn appointment_details(
        &self,
        appointment_id: &str,
        cursor: CalendarCursor,
    ) -> ScreenResult<Option<AppointmentDetails>> {
        let view = self.load_calendar(cursor).await?;
        Ok(view
            .appointments
            .into_iter()
            .find(|a| a.id == appointment_id)
            .map(|appointment| AppointmentDetails {
                form: self.appointment_form_defaults(&appointment),
                services_label: grid::services_label(&appointment),
                appointment,
            }))
    }

    /// Creates (`id == None`) or updates an appointment, then reloads the calendar.
    pub async fn save_appointment(&self, id: Option<&str>, form: AppointmentForm) -> ScreenResult<CalendarView> {
        self.require_profile()?;
        let (start_minutes, customer) = form.validate()?;

        let customer_id = match customer {
            CustomerChoice::Existing(id) => id,
            CustomerChoice::Create(payload) => {
                let created = self
                    .api
                    .create_customer(&payload)
                    .await
                    .map_err(|e| ScreenError::failed("create customer", messages::CREATE_CUSTOMER_FAILED, e))?;
                info!(customer_id = %created.id, "Customer created from appointment form");
                created.id
            }
        };

        let duration = form.duration();
        let start_time = self.zone.at_minutes(form.date, start_minutes);
        let payload = AppointmentPayload {
            start_time,
            end_time: start_time + Duration::minutes(duration),
            duration_minutes: duration,
            customer_id,
        };

        let result = match id {
            Some(id) => self.api.update_appointment(id, &payload).await,
            None => self.api.create_appointment(&payload).await,
        };
        result.map_err(|e| ScreenError::failed("save appointment", messages::SAVE_APPOINTMENT_FAILED, e))?;
        info!(appointment_id = id.unwrap_or("new"), start = %payload.start_time, "Appointment saved");

        let cursor = CalendarCursor::new(form.view.unwrap_or_default(), form.date);
        self.load_calendar(cursor).await
    }

    /// Cancels `appointment_id` and reloads `cursor`.
    ///
    /// An appointment already cancelled in the loaded range is left alone.
    pub async fn cancel_appointment(&self, appointment_id: &str, cursor: CalendarCursor) -> ScreenResult<CalendarView> {
        let current = self.load_calendar(cursor).await?;
        let already_cancelled = current
            .appointments
            .iter()
            .any(|a| a.id == appointment_id && a.is_cancelled());
        if already_cancelled {
            return Ok(current);
        }

        self.api
            .cancel_appointment(appointment_id)
            .await
            .map_err(|e| ScreenError::failed("cancel appointment", messages::CANCEL_APPOINTMENT_FAILED, e))?;
        info!(appointment_id, "Appointment cancelled");

        self.load_calendar(cursor).await
    }

    /// Customer lookup behind the appointment form.
    ///
    /// Blank input clears the results without a request. Interactive input
    /// is debounced; `None` means a newer keystroke superseded this one.
    pub async fn lookup_customers(&self, query: &str) -> Option<ScreenResult<Vec<Customer>>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.customer_lookup.cancel();
            return Some(Ok(Vec::new()));
        }
        let api = self.api.clone();
        self.customer_lookup
            .run(move || async move {
                api.search_customers(&query)
                    .await
                    .map_err(|e| ScreenError::failed("search customers", messages::LOAD_CONTACTS_FAILED, e))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> AppointmentForm {
        AppointmentForm {
            date: date(2024, 6, 10),
            time: "10:00".into(),
            duration_minutes: None,
            customer_id: None,
            new_customer: None,
            view: None,
        }
    }

    #[test]
    fn cursor_steps_by_view() {
        let day = CalendarCursor::new(RangeMode::Day, date(2024, 6, 10));
        assert_eq!(day.prev().date, date(2024, 6, 9));
        assert_eq!(day.next().date, date(2024, 6, 11));

        let week = CalendarCursor::new(RangeMode::Week, date(2024, 6, 10));
        assert_eq!(week.prev().date, date(2024, 6, 3));
        assert_eq!(week.navigate(Nav::Next, date(2000, 1, 1)).date, date(2024, 6, 17));
        assert_eq!(week.navigate(Nav::Today, date(2024, 1, 2)), CalendarCursor::new(RangeMode::Week, date(2024, 1, 2)));
    }

    #[test]
    fn form_requires_a_customer() {
        let err = form().validate().err().unwrap();
        assert_eq!(err.user_message(), messages::CUSTOMER_REQUIRED);
    }

    #[test]
    fn new_customer_needs_name_and_nine_digits() {
        let mut f = form();
        f.new_customer = Some(NewCustomer {
            name: " ".into(),
            phone_digits: "501234567".into(),
        });
        assert_eq!(f.validate().err().unwrap().user_message(), messages::CUSTOMER_NAME_REQUIRED);

        f.new_customer = Some(NewCustomer {
            name: "Elvin".into(),
            phone_digits: "50123".into(),
        });
        assert_eq!(f.validate().err().unwrap().user_message(), messages::LOCAL_PHONE_INCOMPLETE);

        f.new_customer = Some(NewCustomer {
            name: " Elvin ".into(),
            phone_digits: "50 123 45 67".into(),
        });
        match f.validate().unwrap() {
            (600, CustomerChoice::Create(payload)) => {
                assert_eq!(payload.name, "Elvin");
                assert_eq!(payload.phone, "+994501234567");
            }
            _ => panic!("expected a customer to create"),
        }
    }

    #[test]
    fn existing_customer_wins_and_time_is_checked() {
        let mut f = form();
        f.customer_id = Some("c1".into());
        assert!(matches!(f.validate(), Ok((600, CustomerChoice::Existing(ref id))) if id == "c1"));

        f.time = "25:00".into();
        assert_eq!(f.validate().err().unwrap().user_message(), messages::TIME_INVALID);
    }

    #[test]
    fn duration_defaults_to_thirty_minutes() {
        let mut f = form();
        assert_eq!(f.duration(), 30);
        f.duration_minutes = Some(0);
        assert_eq!(f.duration(), 30);
        f.duration_minutes = Some(DURATION_CHOICES[3]);
        assert_eq!(f.duration(), 60);
    }
}
