//! The timezone the client computes calendar boundaries in.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

use crate::grid::{self, DayGrid, WeekGrid};
use crate::labels;
use crate::models::Appointment;
use crate::slots::{self, BusyInterval, SlotCandidate, WorkingHours};
use crate::time_range::{self, RangeMode, TimeRange};

/// Either the host's local zone or a fixed UTC offset from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ClientZone {
    /// Builds a fixed zone from minutes east of UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(ClientZone::Fixed)
    }

    /// Today's calendar date in this zone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date(&now)
    }

    pub fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        match self {
            ClientZone::Local => instant.with_timezone(&Local).date_naive(),
            ClientZone::Fixed(tz) => instant.with_timezone(tz).date_naive(),
        }
    }

    /// `HH:MM` of an instant on the local wall clock.
    pub fn hm_label(&self, instant: &DateTime<Utc>) -> String {
        match self {
            ClientZone::Local => labels::hm(&instant.with_timezone(&Local)),
            ClientZone::Fixed(tz) => labels::hm(&instant.with_timezone(tz)),
        }
    }

    /// `dd.MM.yyyy HH:MM` of an instant on the local wall clock.
    pub fn datetime_label(&self, instant: &DateTime<Utc>) -> String {
        match self {
            ClientZone::Local => labels::date_time(&instant.with_timezone(&Local)),
            ClientZone::Fixed(tz) => labels::date_time(&instant.with_timezone(tz)),
        }
    }

    pub fn range(&self, mode: RangeMode, date: NaiveDate) -> TimeRange {
        match self {
            ClientZone::Local => time_range::range_for(mode, date, &Local),
            ClientZone::Fixed(tz) => time_range::range_for(mode, date, tz),
        }
    }

    /// Instant of a minute offset from local midnight on `date`.
    pub fn at_minutes(&self, date: NaiveDate, minutes: i64) -> DateTime<Utc> {
        match self {
            ClientZone::Local => slots::local_instant(date, minutes, &Local),
            ClientZone::Fixed(tz) => slots::local_instant(date, minutes, tz),
        }
    }

    pub fn slots(
        &self,
        date: NaiveDate,
        duration_minutes: i64,
        hours: WorkingHours,
        busy: &[BusyInterval],
        now: DateTime<Utc>,
    ) -> Vec<SlotCandidate> {
        match self {
            ClientZone::Local => slots::compute_slots(date, &Local, duration_minutes, hours, busy, now),
            ClientZone::Fixed(tz) => slots::compute_slots(date, tz, duration_minutes, hours, busy, now),
        }
    }

    pub fn day_grid(&self, date: NaiveDate, hours: WorkingHours, appointments: &[Appointment]) -> DayGrid {
        match self {
            ClientZone::Local => grid::project_day(date, &Local, hours, appointments),
            ClientZone::Fixed(tz) => grid::project_day(date, tz, hours, appointments),
        }
    }

    pub fn week_grid(&self, date: NaiveDate, hours: WorkingHours, appointments: &[Appointment]) -> WeekGrid {
        match self {
            ClientZone::Local => grid::project_week(date, &Local, hours, appointments),
            ClientZone::Fixed(tz) => grid::project_week(date, tz, hours, appointments),
        }
    }

    /// Weekday label for a date string from the dashboard API.
    pub fn weekday_label(&self, date_from_api: &str) -> String {
        match self {
            ClientZone::Local => labels::weekday_label_for_api_date(date_from_api, &Local),
            ClientZone::Fixed(tz) => labels::weekday_label_for_api_date(date_from_api, tz),
        }
    }

    /// Local `HH:MM` label of a UTC hour bucket.
    pub fn utc_hour_label(&self, hour: u32) -> String {
        match self {
            ClientZone::Local => labels::utc_hour_label(hour, &Local),
            ClientZone::Fixed(tz) => labels::utc_hour_label(hour, tz),
        }
    }
}
