use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// One row per (user, date): the word actually handed to this user that day,
/// whatever path produced it. The delivery worker keys its "should I notify"
/// decision off this row's insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDelivery {
    pub user_id: String,
    pub date: String,
    pub word_id: String,
    pub delivered_at: DateTime<Utc>,
}

impl Store {
    /// Insert-or-ignore. Returns `true` only when this call created the row,
    /// i.e. the user has not already received a word for this date.
    pub fn insert_delivery_once(&self, delivery: &WordDelivery) -> Result<bool, StoreError> {
        let key = keys::delivery_key(&delivery.user_id, &delivery.date);
        let bytes = Self::serialize(delivery)?;
        let cas = self
            .word_deliveries
            .compare_and_swap(key.as_bytes(), None::<&[u8]>, Some(bytes))
            .map_err(StoreError::Sled)?;
        Ok(cas.is_ok())
    }

    pub fn get_delivery(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<WordDelivery>, StoreError> {
        let key = keys::delivery_key(user_id, date);
        match self.word_deliveries.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }
}
