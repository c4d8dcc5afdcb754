//! Dashboard screen: KPIs and three bar charts over the summary aggregates.

use serde::Serialize;

use super::AppState;
use crate::error::{ScreenError, ScreenResult};
use crate::labels;
use crate::messages;
use crate::models::DashboardSummary;
use crate::zone::ClientZone;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub label: String,
    pub count: u32,
    /// Length relative to the largest bar of the chart, 0-100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub today_appointments: u32,
    pub week_appointments: u32,
    pub total_customers: u32,
    pub returning_clients: u32,
    /// The backend's percentage, rounded: `42%`.
    pub returning_rate_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub kpis: Kpis,
    pub weekly: Vec<Bar>,
    pub recency: Vec<Bar>,
    pub top_hours: Vec<Bar>,
}

fn bars(entries: impl IntoIterator<Item = (String, u32)>) -> Vec<Bar> {
    let entries: Vec<(String, u32)> = entries.into_iter().collect();
    let max = entries.iter().map(|(_, count)| *count).max().unwrap_or(0);
    entries
        .into_iter()
        .map(|(label, count)| Bar {
            label,
            count,
            percent: labels::percent_of_max(count, max),
        })
        .collect()
}

impl DashboardView {
    pub fn project(summary: &DashboardSummary, zone: &ClientZone) -> Self {
        Self {
            kpis: Kpis {
                today_appointments: summary.today_appointments,
                week_appointments: summary.week_appointments,
                total_customers: summary.total_customers,
                returning_clients: summary.returning_clients,
                returning_rate_label: format!("{}%", summary.returning_rate.round() as i64),
            },
            weekly: bars(
                summary
                    .weekly_appointments
                    .iter()
                    .map(|d| (zone.weekday_label(&d.date), d.count)),
            ),
            recency: bars(
                summary
                    .recency_buckets
                    .iter()
                    .map(|(bucket, count)| (labels::recency_bucket_label(bucket), *count)),
            ),
            top_hours: bars(summary.top_hours.iter().map(|h| (zone.utc_hour_label(h.hour), h.count))),
        }
    }
}

impl AppState {
    pub async fn load_dashboard(&self) -> ScreenResult<DashboardView> {
        self.require_profile()?;
        let summary = self
            .api
            .dashboard_summary()
            .await
            .map_err(|e| ScreenError::failed("load dashboard", messages::DASHBOARD_FAILED, e))?;
        Ok(DashboardView::project(&summary, &self.zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> DashboardSummary {
        serde_json::from_value(json!({
            "todayAppointments": 3,
            "weekAppointments": 12,
            "totalCustomers": 40,
            "returningClients": 17,
            "returningRate": 42.6,
            "weeklyAppointments": [
                { "date": "2024-06-10", "count": 4 },
                { "date": "2024-06-11", "count": 2 }
            ],
            "recencyBuckets": { "0-30": 10, "no-visit": 0, "31-60": 5 },
            "topHours": [{ "hour": 6, "count": 3 }, { "hour": 20, "count": 1 }]
        }))
        .unwrap()
    }

    #[test]
    fn projects_labels_in_client_zone() {
        let zone = ClientZone::from_offset_minutes(240).unwrap();
        let view = DashboardView::project(&summary(), &zone);

        assert_eq!(view.kpis.returning_rate_label, "43%");
        assert_eq!(view.weekly[0].label, "B.e.");
        assert_eq!(view.weekly[0].percent, 100.0);
        assert_eq!(view.weekly[1].percent, 50.0);

        let hours: Vec<&str> = view.top_hours.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(hours, vec!["10:00", "00:00"]);

        let recency: Vec<&str> = view.recency.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(recency, vec!["0–30 gün", "31–60 gün", "Hələ ziyarət yoxdur"]);
    }

    #[test]
    fn returning_rate_is_shown_as_sent() {
        let zone = ClientZone::from_offset_minutes(240).unwrap();
        let mut summary = summary();

        summary.returning_rate = 1.0;
        assert_eq!(DashboardView::project(&summary, &zone).kpis.returning_rate_label, "1%");

        summary.returning_rate = 0.4;
        assert_eq!(DashboardView::project(&summary, &zone).kpis.returning_rate_label, "0%");
    }

    #[test]
    fn all_zero_series_have_zero_length_bars() {
        let empty = bars(vec![("a".to_string(), 0), ("b".to_string(), 0)]);
        assert!(empty.iter().all(|b| b.percent == 0.0));
        assert!(bars(Vec::new()).is_empty());
    }
}
