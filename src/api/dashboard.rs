//! `/dashboard` endpoints.

use super::ApiGateway;
use crate::error::ClientError;
use crate::models::DashboardSummary;

impl ApiGateway {
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ClientError> {
        self.get_json(&["dashboard", "summary"], &[]).await
    }
}
