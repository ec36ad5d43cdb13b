use std::sync::Arc;

use chrono::Utc;

use crate::store::operations::events::AnalyticsEvent;
use crate::store::Store;

/// Opaque analytics hand-off. Recording failures are logged, never surfaced.
pub trait AnalyticsSink: Send + Sync {
    fn record_event(&self, name: &str, user_id: Option<&str>, metadata: serde_json::Value);
}

pub struct StoreAnalytics {
    store: Arc<Store>,
}

impl StoreAnalytics {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

impl AnalyticsSink for StoreAnalytics {
    fn record_event(&self, name: &str, user_id: Option<&str>, metadata: serde_json::Value) {
        let event = AnalyticsEvent {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            user_id: user_id.map(str::to_string),
            metadata,
            created_at: Utc::now(),
        };
        if let Err(e) = self.store.record_analytics_event(&event) {
            tracing::warn!(name, error = %e, "Failed to record analytics event");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn record_event_appends_a_row() {
        let dir = tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("analytics").to_str().unwrap()).unwrap());
        let sink = StoreAnalytics::new(store.clone());

        sink.record_event("word_delivered", Some("u1"), serde_json::json!({"wordId": "w1"}));

        let events = store.list_recent_analytics_events(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "word_delivered");
        assert_eq!(events[0].user_id.as_deref(), Some("u1"));
    }
}
