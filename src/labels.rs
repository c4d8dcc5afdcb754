//! Display labels: clock times, weekday names, dashboard buckets and
//! contact visit summaries.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

/// Azerbaijani short weekday names.
pub fn weekday_short_az(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "B.",
        Weekday::Mon => "B.e.",
        Weekday::Tue => "Ç.a.",
        Weekday::Wed => "Ç.",
        Weekday::Thu => "C.a.",
        Weekday::Fri => "C.",
        Weekday::Sat => "Ş.",
    }
}

/// `HH:MM` on the instant's own wall clock.
pub fn hm<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.naive_local().format("%H:%M").to_string()
}

/// `dd.MM.yyyy HH:MM` on the instant's own wall clock.
pub fn date_time<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant.naive_local().format("%d.%m.%Y %H:%M").to_string()
}

/// Minute offset from midnight as `HH:MM`.
pub fn minutes_to_hm(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses `HH:MM` into a minute offset from midnight.
pub fn parse_hm(value: &str) -> Option<i64> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Parses the dashboard's date values.
///
/// Accepts `YYYY-MM-DD` (read as UTC midnight) and ISO timestamps with or
/// without a zone designator (zone-less values are UTC).
pub fn parse_api_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if !value.contains('T') {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = value.trim_end_matches(['Z', 'z']);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// Weekday short name, in `tz`, of a UTC date from the dashboard API.
///
/// Unparseable input is echoed back unchanged.
pub fn weekday_label_for_api_date<Tz: TimeZone>(value: &str, tz: &Tz) -> String {
    match parse_api_instant(value) {
        Some(instant) => weekday_short_az(instant.with_timezone(tz).weekday()).to_string(),
        None => value.to_string(),
    }
}

/// Local `HH:MM` of a UTC hour bucket (0-23).
pub fn utc_hour_label<Tz: TimeZone>(hour: u32, tz: &Tz) -> String {
    let reference = Utc
        .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .map(|midnight| midnight + Duration::hours(i64::from(hour % 24)));
    match reference {
        Some(instant) => hm(&instant.with_timezone(tz)),
        None => minutes_to_hm(i64::from(hour % 24) * 60),
    }
}

/// Label of a recency bucket key from the dashboard summary.
pub fn recency_bucket_label(bucket: &str) -> String {
    match bucket {
        "0-30" => "0–30 gün".to_string(),
        "31-60" => "31–60 gün".to_string(),
        "61-90" => "61–90 gün".to_string(),
        "90+" => "90+ gün".to_string(),
        "no-visit" => "Hələ ziyarət yoxdur".to_string(),
        other => other.to_string(),
    }
}

/// "Last visit" line of a contact card.
pub fn last_visit_label(last_visit: Option<NaiveDate>) -> String {
    match last_visit {
        Some(date) => date.format("%-d %b %Y").to_string(),
        None => "Hələ ziyarət etməyib".to_string(),
    }
}

/// Estimated days between visits, from first record to last visit.
pub fn visit_frequency_days(
    visit_count: u32,
    created: Option<NaiveDate>,
    last_visit: Option<NaiveDate>,
) -> Option<i64> {
    let (first, last) = (created?, last_visit?);
    if visit_count <= 1 {
        return None;
    }
    let days_total = (last - first).num_days().max(1);
    let per_visit = (days_total as f64 / f64::from(visit_count - 1)).round() as i64;
    Some(per_visit.max(1))
}

/// "Visit frequency" line of a contact card.
pub fn visit_frequency_label(
    visit_count: u32,
    created: Option<NaiveDate>,
    last_visit: Option<NaiveDate>,
) -> String {
    match visit_frequency_days(visit_count, created, last_visit) {
        Some(days) => format!("Təxmini: {days} gündən bir"),
        None => "Tezlik üçün kifayət qədər məlumat yoxdur".to_string(),
    }
}

/// Bar length as a percentage of the series maximum (floored at 1).
pub fn percent_of_max(value: u32, max: u32) -> f64 {
    let max = max.max(1);
    f64::from(value) / f64::from(max) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn baku() -> FixedOffset {
        FixedOffset::east_opt(4 * 3600).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minutes_round_trip_through_hm() {
        assert_eq!(minutes_to_hm(480), "08:00");
        assert_eq!(minutes_to_hm(1230), "20:30");
        assert_eq!(parse_hm("09:45"), Some(585));
        assert_eq!(parse_hm("24:00"), None);
        assert_eq!(parse_hm("nine"), None);
    }

    #[test]
    fn weekday_label_shifts_into_the_client_zone() {
        // 2024-06-09 is a Sunday; 22:00 UTC is already Monday in Baku.
        assert_eq!(weekday_label_for_api_date("2024-06-09", &baku()), "B.");
        assert_eq!(weekday_label_for_api_date("2024-06-09T22:00:00", &baku()), "B.e.");
        assert_eq!(weekday_label_for_api_date("2024-06-09T22:00:00.000Z", &Utc), "B.");
        assert_eq!(weekday_label_for_api_date("", &Utc), "");
        assert_eq!(weekday_label_for_api_date("garbage", &Utc), "garbage");
    }

    #[test]
    fn utc_hour_bucket_is_shown_in_local_time() {
        assert_eq!(utc_hour_label(6, &baku()), "10:00");
        assert_eq!(utc_hour_label(22, &baku()), "02:00");
        assert_eq!(utc_hour_label(6, &Utc), "06:00");
    }

    #[test]
    fn recency_buckets_have_localized_labels() {
        assert_eq!(recency_bucket_label("31-60"), "31–60 gün");
        assert_eq!(recency_bucket_label("no-visit"), "Hələ ziyarət yoxdur");
        assert_eq!(recency_bucket_label("custom"), "custom");
    }

    #[test]
    fn frequency_needs_two_visits_and_both_dates() {
        assert_eq!(visit_frequency_days(1, Some(date(2024, 1, 1)), Some(date(2024, 3, 1))), None);
        assert_eq!(visit_frequency_days(3, None, Some(date(2024, 3, 1))), None);
        assert_eq!(visit_frequency_days(3, Some(date(2024, 1, 1)), Some(date(2024, 1, 31))), Some(15));
        // Same-day visits still report at least one day.
        assert_eq!(visit_frequency_days(5, Some(date(2024, 1, 1)), Some(date(2024, 1, 1))), Some(1));
        assert_eq!(
            visit_frequency_label(3, Some(date(2024, 1, 1)), Some(date(2024, 1, 31))),
            "Təxmini: 15 gündən bir"
        );
    }

    #[test]
    fn last_visit_label_formats_day_month_year() {
        assert_eq!(last_visit_label(Some(date(2024, 6, 5))), "5 Jun 2024");
        assert_eq!(last_visit_label(None), "Hələ ziyarət etməyib");
    }

    #[test]
    fn percent_of_max_floors_the_denominator() {
        assert_eq!(percent_of_max(0, 0), 0.0);
        assert_eq!(percent_of_max(2, 4), 50.0);
        assert_eq!(percent_of_max(1, 0), 100.0);
    }
}
