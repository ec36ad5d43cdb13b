use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::store::operations::notifications::{Notification, NotificationType};
use crate::store::Store;

/// Notification dispatch hand-off. Fire-and-forget from the engine's
/// perspective: delivery failures are the implementation's concern and must
/// never propagate into the selection/scheduler path.
pub trait WordNotifier: Send + Sync {
    fn deliver(&self, user_id: &str, word_id: &str, date: NaiveDate);
}

/// In-process implementation that writes an in-app notification row.
/// Push transport lives behind this same trait in deployments that have one.
pub struct InAppNotifier {
    store: Arc<Store>,
}

impl InAppNotifier {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

impl WordNotifier for InAppNotifier {
    fn deliver(&self, user_id: &str, word_id: &str, date: NaiveDate) {
        let word_text = match self.store.get_word_entry(word_id) {
            Ok(Some(entry)) => entry.text,
            Ok(None) => word_id.to_string(),
            Err(e) => {
                tracing::warn!(user_id, word_id, error = %e, "Failed to load word for notification");
                word_id.to_string()
            }
        };

        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            notification_type: NotificationType::WordDelivery,
            title: "Word of the day".to_string(),
            message: format!("Your word for {date} is \"{word_text}\""),
            read: false,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.create_notification(&notification) {
            tracing::warn!(user_id, word_id, error = %e, "Failed to write delivery notification");
        }
    }
}
