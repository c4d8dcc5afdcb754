//! Bookable start times for a day.
//!
//! Candidates are laid out at a fixed 30-minute stride from the start of the
//! working-hour window and stop at the last start that still fits before
//! closing. Every candidate is returned; taken or past ones are flagged
//! unavailable rather than dropped.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::labels;
use crate::models::{Appointment, BarberProfile};
use crate::time_range::{self, resolve_local};

/// Stride between candidate starts, and the height of one grid row.
pub const SLOT_MINUTES: i64 = 30;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A business's bookable window as minute offsets from local midnight.
///
/// Always satisfies `start < end <= 24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    start_minutes: i64,
    end_minutes: i64,
}

impl Default for WorkingHours {
    /// 08:00-20:00.
    fn default() -> Self {
        Self {
            start_minutes: 8 * 60,
            end_minutes: 20 * 60,
        }
    }
}

impl WorkingHours {
    /// A window, or `None` if it is empty, inverted or outside the day.
    pub fn new(start_minutes: i64, end_minutes: i64) -> Option<Self> {
        if start_minutes < 0 || end_minutes > MINUTES_PER_DAY || end_minutes <= start_minutes {
            return None;
        }
        Some(Self {
            start_minutes,
            end_minutes,
        })
    }

    /// Missing bounds take the default; an invalid window falls back to 08:00-20:00.
    pub fn resolve(start_minutes: Option<i64>, end_minutes: Option<i64>) -> Self {
        let fallback = Self::default();
        Self::new(
            start_minutes.unwrap_or(fallback.start_minutes),
            end_minutes.unwrap_or(fallback.end_minutes),
        )
        .unwrap_or(fallback)
    }

    pub fn for_profile(profile: &BarberProfile) -> Self {
        Self::resolve(profile.work_day_start_minutes, profile.work_day_end_minutes)
    }

    pub fn start_minutes(&self) -> i64 {
        self.start_minutes
    }

    pub fn end_minutes(&self) -> i64 {
        self.end_minutes
    }

    /// Row offsets `start, start+30, ...` strictly before `end`.
    pub fn rows(&self) -> impl Iterator<Item = i64> {
        let end = self.end_minutes;
        (self.start_minutes..end).step_by(SLOT_MINUTES as usize)
    }
}

/// An occupied `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Occupied time of every appointment the day listing returned, using its
    /// effective end. Status is not consulted.
    pub fn from_appointments(appointments: &[Appointment]) -> Vec<Self> {
        appointments
            .iter()
            .map(|a| BusyInterval {
                start: a.start_time,
                end: a.effective_end(),
            })
            .collect()
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// One candidate start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCandidate {
    pub start: DateTime<Utc>,
    /// UTC ISO string, used as the slot's identity by clients.
    pub iso: String,
    /// Local `HH:MM`.
    pub label: String,
    pub available: bool,
}

/// Instant of `minutes` after local midnight on `date`.
pub fn local_instant<Tz: TimeZone>(date: NaiveDate, minutes: i64, tz: &Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN) + Duration::minutes(minutes))
}

/// Candidate starts for `date` with their availability.
///
/// A candidate is unavailable when it starts before `now` or when
/// `[start, start + duration)` overlaps any busy interval. A non-positive
/// duration, or one longer than the working window, yields no candidates.
pub fn compute_slots<Tz: TimeZone>(
    date: NaiveDate,
    tz: &Tz,
    duration_minutes: i64,
    hours: WorkingHours,
    busy: &[BusyInterval],
    now: DateTime<Utc>,
) -> Vec<SlotCandidate> {
    if duration_minutes <= 0 || duration_minutes > hours.end_minutes - hours.start_minutes {
        return Vec::new();
    }
    let duration = Duration::minutes(duration_minutes);

    let mut slots = Vec::new();
    let mut offset = hours.start_minutes;
    while offset + duration_minutes <= hours.end_minutes {
        let start = local_instant(date, offset, tz);
        let end = start + duration;
        let available = start >= now && !busy.iter().any(|b| b.overlaps(start, end));
        slots.push(SlotCandidate {
            start,
            iso: time_range::to_utc_iso(&start),
            label: labels::hm(&start.with_timezone(tz)),
            available,
        });
        offset += SLOT_MINUTES;
    }
    slots
}

/// Sum of the durations of the selected services.
pub fn total_duration<'a>(durations: impl IntoIterator<Item = &'a i64>) -> i64 {
    durations
        .into_iter()
        .fold(0_i64, |total, d| total.saturating_add((*d).max(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use crate::models::AppointmentStatus;

    fn baku() -> FixedOffset {
        FixedOffset::east_opt(4 * 3600).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        baku()
            .with_ymd_and_hms(2024, 6, 10, hour, minute, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn before_opening() -> DateTime<Utc> {
        at(7, 0)
    }

    fn appt(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Appointment {
        Appointment {
            id: "a".into(),
            start_time: start,
            end_time: end,
            status: AppointmentStatus::Active,
            customer: None,
            services: Vec::new(),
            name: None,
            service_ids: None,
        }
    }

    #[test]
    fn single_booking_blocks_exactly_one_half_hour() {
        let busy = BusyInterval::from_appointments(&[appt(at(10, 0), Some(at(10, 30)))]);
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &busy, before_opening());

        assert_eq!(slots.len(), 24);
        assert_eq!(slots.first().unwrap().label, "08:00");
        assert_eq!(slots.last().unwrap().label, "19:30");
        let taken: Vec<_> = slots.iter().filter(|s| !s.available).map(|s| s.label.as_str()).collect();
        assert_eq!(taken, vec!["10:00"]);
    }

    #[test]
    fn long_service_stops_at_the_last_start_that_fits() {
        let slots = compute_slots(day(), &baku(), 90, WorkingHours::default(), &[], before_opening());

        assert_eq!(slots.last().unwrap().label, "18:30");
        assert!(slots.iter().all(|s| s.label != "19:00"));
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn no_duration_means_no_candidates() {
        assert!(compute_slots(day(), &baku(), 0, WorkingHours::default(), &[], before_opening()).is_empty());
        assert!(compute_slots(day(), &baku(), -30, WorkingHours::default(), &[], before_opening()).is_empty());
    }

    #[test]
    fn past_starts_are_unavailable() {
        let now = at(12, 10);
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &[], now);

        for slot in &slots {
            assert_eq!(slot.available, slot.start >= now, "slot {}", slot.label);
        }
        assert!(!slots.iter().find(|s| s.label == "12:00").unwrap().available);
        assert!(slots.iter().find(|s| s.label == "12:30").unwrap().available);
    }

    #[test]
    fn appointment_without_end_blocks_thirty_minutes() {
        let busy = BusyInterval::from_appointments(&[appt(at(9, 0), None)]);
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &busy, before_opening());

        let taken: Vec<_> = slots.iter().filter(|s| !s.available).map(|s| s.label.as_str()).collect();
        assert_eq!(taken, vec!["09:00"]);
    }

    #[test]
    fn longer_request_overlaps_a_later_booking() {
        // A 60 minute request at 09:30 runs into the 10:00 booking.
        let busy = BusyInterval::from_appointments(&[appt(at(10, 0), Some(at(10, 30)))]);
        let slots = compute_slots(day(), &baku(), 60, WorkingHours::default(), &busy, before_opening());

        let taken: Vec<_> = slots.iter().filter(|s| !s.available).map(|s| s.label.as_str()).collect();
        assert_eq!(taken, vec!["09:30", "10:00"]);
    }

    #[test]
    fn adjacent_bookings_do_not_block() {
        let busy = BusyInterval::from_appointments(&[appt(at(8, 0), Some(at(8, 30))), appt(at(9, 0), Some(at(9, 30)))]);
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &busy, before_opening());

        assert!(slots.iter().find(|s| s.label == "08:30").unwrap().available);
    }

    #[test]
    fn listed_appointments_block_regardless_of_status() {
        let mut cancelled = appt(at(10, 0), Some(at(10, 30)));
        cancelled.status = AppointmentStatus::Cancelled;
        let busy = BusyInterval::from_appointments(&[cancelled]);
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &busy, before_opening());

        assert_eq!(busy.len(), 1);
        assert!(!slots.iter().find(|s| s.label == "10:00").unwrap().available);
    }

    #[test]
    fn duration_longer_than_the_day_yields_nothing() {
        let hours = WorkingHours::default();
        assert!(compute_slots(day(), &baku(), 12 * 60 + 1, hours, &[], before_opening()).is_empty());
        assert!(compute_slots(day(), &baku(), i64::MAX, hours, &[], before_opening()).is_empty());
        assert_eq!(compute_slots(day(), &baku(), 12 * 60, hours, &[], before_opening()).len(), 1);
    }

    #[test]
    fn every_candidate_fits_before_closing_and_is_stable() {
        let hours = WorkingHours::new(9 * 60 + 15, 17 * 60).unwrap();
        let busy = BusyInterval::from_appointments(&[appt(at(11, 0), Some(at(12, 15)))]);
        for duration in [15, 30, 45, 60, 75, 120, 465, 500] {
            let first = compute_slots(day(), &baku(), duration, hours, &busy, before_opening());
            let second = compute_slots(day(), &baku(), duration, hours, &busy, before_opening());
            assert_eq!(first, second);

            for slot in &first {
                let closing = local_instant(day(), hours.end_minutes(), &baku());
                assert!(slot.start + Duration::minutes(duration) <= closing);
                let overlapping = busy.iter().any(|b| b.overlaps(slot.start, slot.start + Duration::minutes(duration)));
                assert_eq!(slot.available, !overlapping);
            }
            assert!(first.windows(2).all(|w| w[0].start < w[1].start));
        }
    }

    #[test]
    fn iso_identity_is_the_utc_instant() {
        let slots = compute_slots(day(), &baku(), 30, WorkingHours::default(), &[], before_opening());

        assert_eq!(slots[0].iso, "2024-06-10T04:00:00.000Z");
    }

    #[test]
    fn invalid_windows_fall_back_to_defaults() {
        assert_eq!(WorkingHours::resolve(Some(600), Some(540)), WorkingHours::default());
        assert_eq!(WorkingHours::resolve(None, None), WorkingHours::default());
        assert_eq!(WorkingHours::resolve(Some(600), None).end_minutes(), 20 * 60);
        assert_eq!(WorkingHours::resolve(Some(600), Some(600)), WorkingHours::default());
        assert!(WorkingHours::new(0, 24 * 60).is_some());
        assert!(WorkingHours::new(0, 24 * 60 + 30).is_none());
    }

    #[test]
    fn rows_cover_the_window_half_open() {
        let rows: Vec<_> = WorkingHours::new(600, 720).unwrap().rows().collect();
        assert_eq!(rows, vec![600, 630, 660, 690]);
    }

    #[test]
    fn total_duration_ignores_negative_entries() {
        assert_eq!(total_duration(&[30, 45, -10]), 75);
        assert_eq!(total_duration(&[]), 0);
        assert_eq!(total_duration(&[i64::MAX, 30]), i64::MAX);
    }
}
