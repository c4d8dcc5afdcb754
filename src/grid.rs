//! Day and week calendar grids.
//!
//! Appointments are projected onto fixed 30-minute rows spanning the business's
//! working hours. An appointment covering several rows is drawn once: its first
//! row carries the label block and the following rows are continuations, the
//! final one capped. The projection is pure and cheap to recompute.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::labels;
use crate::models::{Appointment, AppointmentStatus};
use crate::slots::{local_instant, WorkingHours, SLOT_MINUTES};
use crate::time_range;

/// Placeholder shown when an appointment has no customer name.
pub const UNNAMED_APPOINTMENT: &str = "Görüş";

/// Where a row sits within the appointment occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPart {
    /// The appointment fits in this one row.
    Single,
    /// First row of a longer appointment.
    Head,
    /// Interior continuation row.
    Body,
    /// Last row of a longer appointment.
    Tail,
}

impl SlotPart {
    fn from_flags(is_first: bool, is_last: bool) -> Self {
        match (is_first, is_last) {
            (true, true) => SlotPart::Single,
            (true, false) => SlotPart::Head,
            (false, true) => SlotPart::Tail,
            (false, false) => SlotPart::Body,
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, SlotPart::Single | SlotPart::Head)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, SlotPart::Single | SlotPart::Tail)
    }
}

/// Text shown on an appointment's first row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentLabel {
    pub customer_name: String,
    pub customer_phone: String,
    /// `HH:MM – HH:MM` in local time.
    pub time_range: String,
    pub services: String,
    pub status: AppointmentStatus,
}

/// The appointment occupying a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupant {
    pub appointment_id: String,
    pub part: SlotPart,
    /// Present on `Single` and `Head` rows only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<AppointmentLabel>,
}

/// One 30-minute cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant: Option<Occupant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRow {
    pub time_label: String,
    #[serde(flatten)]
    pub cell: GridCell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGrid {
    pub date: NaiveDate,
    pub hours: WorkingHours,
    pub rows: Vec<DayRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDayHeader {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub day_of_month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRow {
    pub time_label: String,
    /// One cell per day, Monday first.
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGrid {
    pub week_start: NaiveDate,
    pub hours: WorkingHours,
    pub days: Vec<WeekDayHeader>,
    pub rows: Vec<WeekRow>,
}

/// `name` for one service, `first +N` for several.
pub fn services_label(appointment: &Appointment) -> String {
    match appointment.services.as_slice() {
        [] => String::new(),
        [only] => only.name.clone(),
        [first, rest @ ..] => format!("{} +{}", first.name, rest.len()),
    }
}

fn label_for<Tz: TimeZone>(appointment: &Appointment, tz: &Tz) -> AppointmentLabel {
    let customer = appointment.customer.as_ref();
    let customer_name = customer
        .and_then(|c| c.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED_APPOINTMENT.to_string());
    let customer_phone = customer.and_then(|c| c.phone.clone()).unwrap_or_default();
    let start = labels::hm(&appointment.start_time.with_timezone(tz));
    let end = labels::hm(&appointment.effective_end().with_timezone(tz));

    AppointmentLabel {
        customer_name,
        customer_phone,
        time_range: format!("{start} – {end}"),
        services: services_label(appointment),
        status: appointment.status,
    }
}

/// Projects the appointment covering `slot_start`, if any.
///
/// The first appointment in list order whose `[start, effective end)` contains
/// the slot start wins. `only_on` restricts matches to appointments starting on
/// that local date.
fn occupant_at<Tz: TimeZone>(
    slot_start: DateTime<Utc>,
    appointments: &[Appointment],
    tz: &Tz,
    only_on: Option<NaiveDate>,
) -> Option<Occupant> {
    let appointment = appointments.iter().find(|a| {
        let same_day = only_on.map_or(true, |d| a.start_time.with_timezone(tz).date_naive() == d);
        same_day && a.start_time <= slot_start && slot_start < a.effective_end()
    })?;

    let slot_end = slot_start + Duration::minutes(SLOT_MINUTES);
    let end = appointment.effective_end();
    let local_slot = slot_start.with_timezone(tz);
    let local_start = appointment.start_time.with_timezone(tz);
    let is_first = local_slot.date_naive() == local_start.date_naive()
        && labels::hm(&local_slot) == labels::hm(&local_start);
    let is_last = slot_end >= end && slot_start < end;
    let part = SlotPart::from_flags(is_first, is_last);

    Some(Occupant {
        appointment_id: appointment.id.clone(),
        part,
        label: part.is_first().then(|| label_for(appointment, tz)),
    })
}

/// Rows for a single day.
pub fn project_day<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
    hours: WorkingHours,
    appointments: &[Appointment],
) -> DayGrid {
    let rows = hours
        .rows()
        .map(|minutes| {
            let start = local_instant(date, minutes, tz);
            DayRow {
                time_label: labels::minutes_to_hm(minutes),
                cell: GridCell {
                    start,
                    occupant: occupant_at(start, appointments, tz, Some(date)),
                },
            }
        })
        .collect();

    DayGrid { date, hours, rows }
}

/// Rows for the Monday-first week containing `date`.
pub fn project_week<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
    hours: WorkingHours,
    appointments: &[Appointment],
) -> WeekGrid {
    let days = time_range::week_days(date);
    let headers = days
        .iter()
        .map(|d| WeekDayHeader {
            date: *d,
            weekday: labels::weekday_short_az(d.weekday()),
            day_of_month: d.day(),
        })
        .collect();

    let rows = hours
        .rows()
        .map(|minutes| WeekRow {
            time_label: labels::minutes_to_hm(minutes),
            cells: days
                .iter()
                .map(|d| {
                    let start = local_instant(*d, minutes, tz);
                    GridCell {
                        start,
                        occupant: occupant_at(start, appointments, tz, None),
                    }
                })
                .collect(),
        })
        .collect();

    WeekGrid {
        week_start: days[0],
        hours,
        days: headers,
        rows,
    }
}
