// Report and history endpoints

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{HistoryEntry, Id};

impl ApiClient {
    /// Aggregate counters for the dashboard.
    ///
    /// `GET /reports/summary?property_id=...`
    pub async fn report_summary(&self, property_id: Option<Id>) -> Result<Value, Error> {
        debug!(?property_id, "fetching report summary");
        let query: Vec<(&str, String)> = property_id
            .map(|id| ("property_id", id.to_string()))
            .into_iter()
            .collect();
        self.get_value("reports/summary", &query).await
    }

    /// Audit history, optionally narrowed to one entity.
    ///
    /// `GET /history?entity_type=...&entity_id=...`
    pub async fn history(&self, entity_type: Option<&str>, entity_id: Option<Id>) -> Result<Vec<HistoryEntry>, Error> {
        debug!(?entity_type, ?entity_id, "fetching history");
        let mut query = Vec::new();
        if let Some(kind) = entity_type {
            query.push(("entity_type", kind.to_owned()));
        }
        if let Some(id) = entity_id {
            query.push(("entity_id", id.to_string()));
        }
        self.get_list("history", &query, "history").await
    }
}
