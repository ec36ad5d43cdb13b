use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// Append-only analytics event, keyed by reverse timestamp so newest-first
/// scans are a plain prefix iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn record_analytics_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        let key = keys::analytics_event_key(event.created_at.timestamp_millis(), &event.id);
        self.analytics_events
            .insert(key.as_bytes(), Self::serialize(event)?)?;
        Ok(())
    }

    pub fn list_recent_analytics_events(
        &self,
        limit: usize,
    ) -> Result<Vec<AnalyticsEvent>, StoreError> {
        let mut events = Vec::new();
        for item in self.analytics_events.iter() {
            let (_, raw) = item?;
            events.push(Self::deserialize::<AnalyticsEvent>(&raw)?);
            if events.len() >= limit {
                break;
            }
        }
        Ok(events)
    }
}
