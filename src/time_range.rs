//! Local calendar day/week ⇒ UTC instant bounds for backend range queries.
//!
//! Only the boundary computation is calendar-aware; the resulting instants are
//! serialised as-is (`2024-06-09T20:00:00.000Z`), with no offset arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

/// Which calendar span a range query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    #[default]
    Day,
    Week,
}

/// A closed `[from, to]` range of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn from_iso(&self) -> String {
        to_utc_iso(&self.from)
    }

    pub fn to_iso(&self) -> String {
        to_utc_iso(&self.to)
    }

    /// Query parameters in the shape the backend expects.
    pub fn query(&self) -> [(&'static str, String); 2] {
        [("from", self.from_iso()), ("to", self.to_iso())]
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.from <= *instant && *instant <= self.to
    }
}

/// Serialises an instant as UTC ISO-8601 with millisecond precision.
pub fn to_utc_iso<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter writing instants the way [`to_utc_iso`] does.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_utc_iso(instant))
    }
}

/// Resolves a local wall-clock time to an instant.
///
/// Ambiguous times (DST fold) take the earlier instant. Times inside a DST gap
/// move forward to the first valid instant after it.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = local;
    // Real-world gaps never exceed a few hours.
    for _ in 0..=24 * 4 {
        if let Some(resolved) = tz.from_local_datetime(&candidate).earliest() {
            return resolved.with_timezone(&Utc);
        }
        candidate += Duration::minutes(15);
    }
    Utc.from_utc_datetime(&local)
}

/// First instant of the local calendar day (00:00:00.000).
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of the local calendar day (23:59:59.999).
pub fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    let next_midnight = start_of_day(date + Duration::days(1), tz);
    let candidate = resolve_local(tz, date.and_time(last));
    // A DST gap at the end of the day must not push the bound into tomorrow.
    if candidate >= next_midnight {
        next_midnight - Duration::milliseconds(1)
    } else {
        candidate
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// The seven dates of the Monday-first week containing `date`.
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = week_start(date);
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// UTC bounds of the local day containing `date`.
pub fn day_range<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> TimeRange {
    TimeRange {
        from: start_of_day(date, tz),
        to: end_of_day(date, tz),
    }
}

/// UTC bounds of the local Monday-to-Sunday week containing `date`.
pub fn week_range<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> TimeRange {
    TimeRange {
        from: start_of_day(week_start(date), tz),
        to: end_of_day(week_end(date), tz),
    }
}

/// Range for the given mode.
pub fn range_for<Tz: TimeZone>(mode: RangeMode, date: NaiveDate, tz: &Tz) -> TimeRange {
    match mode {
        RangeMode::Day => day_range(date, tz),
        RangeMode::Week => week_range(date, tz),
    }
}

/// Range for the local calendar day of a zoned instant.
pub fn range_for_instant<Tz: TimeZone>(mode: RangeMode, instant: &DateTime<Tz>) -> TimeRange {
    range_for(mode, instant.date_naive(), &instant.timezone())
}
