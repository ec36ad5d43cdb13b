use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Transactional;

use crate::selection::band::DifficultyBand;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// The durable memo for the shared word of the day. One immutable row per
/// calendar date; once present it is authoritative and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWordAssignment {
    pub date: String,
    pub word_id: String,
    pub cycle: u64,
    pub assigned_at: DateTime<Utc>,
}

/// One immutable row per (user, date). Null bands mean the user asked for no
/// personalization and received the shared daily word.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWordAssignment {
    pub user_id: String,
    pub date: String,
    pub word_id: String,
    pub requested_band: Option<DifficultyBand>,
    pub effective_band: Option<DifficultyBand>,
    pub assigned_at: DateTime<Utc>,
}

impl UserWordAssignment {
    /// Derived, never stored: the chain had to step past the requested band.
    pub fn used_fallback(&self) -> bool {
        self.requested_band.is_some() && self.requested_band != self.effective_band
    }
}

/// Usage-log coordinates for a personalized pick, written in the same
/// transaction as the assignment row.
#[derive(Debug, Clone, Copy)]
pub struct UserUsageRecord {
    pub band: DifficultyBand,
    pub cycle: u64,
}

fn map_tx_err(e: sled::transaction::TransactionError<()>) -> Option<StoreError> {
    match e {
        // Abort 表示赋值行已存在——并发竞争落败，不是错误
        sled::transaction::TransactionError::Abort(()) => None,
        sled::transaction::TransactionError::Storage(se) => Some(StoreError::Sled(se)),
    }
}

impl Store {
    pub fn get_daily_word(&self, date: &str) -> Result<Option<DailyWordAssignment>, StoreError> {
        let key = keys::daily_word_key(date);
        match self.daily_words.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Insert the daily assignment and its global usage row as one atomic
    /// unit. Returns `false` when another caller already assigned this date;
    /// the caller must then re-read the winning row instead of trusting its
    /// own pick.
    pub fn insert_daily_word(&self, assignment: &DailyWordAssignment) -> Result<bool, StoreError> {
        let key = keys::daily_word_key(&assignment.date);
        let usage_key = keys::global_usage_key(assignment.cycle, &assignment.word_id);
        let bytes = Self::serialize(assignment)?;
        let date_bytes = assignment.date.as_bytes().to_vec();

        let result = (&self.daily_words, &self.word_usage_log).transaction(
            |(tx_daily, tx_usage)| {
                if tx_daily.get(key.as_bytes())?.is_some() {
                    return sled::transaction::abort(());
                }
                tx_daily.insert(key.as_bytes(), bytes.as_slice())?;
                tx_usage.insert(usage_key.as_bytes(), date_bytes.as_slice())?;
                Ok(())
            },
        );

        match result {
            Ok(()) => Ok(true),
            Err(e) => match map_tx_err(e) {
                None => Ok(false),
                Some(store_err) => Err(store_err),
            },
        }
    }

    pub fn get_user_word(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<Option<UserWordAssignment>, StoreError> {
        let key = keys::user_word_key(user_id, date);
        match (self.user_words.get(key.as_bytes()))? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Insert a per-user assignment plus, for personalized picks, the
    /// per-(user, band, cycle) usage row. Same lost-race contract as
    /// [`Store::insert_daily_word`].
    pub fn insert_user_word(
        &self,
        assignment: &UserWordAssignment,
        usage: Option<UserUsageRecord>,
    ) -> Result<bool, StoreError> {
        let key = keys::user_word_key(&assignment.user_id, &assignment.date);
        let bytes = Self::serialize(assignment)?;
        let usage_entry = usage.map(|u| {
            keys::user_usage_key(&assignment.user_id, u.band, u.cycle, &assignment.word_id)
        });
        let date_bytes = assignment.date.as_bytes().to_vec();

        let result = (&self.user_words, &self.user_word_usage_log).transaction(
            |(tx_words, tx_usage)| {
                if tx_words.get(key.as_bytes())?.is_some() {
                    return sled::transaction::abort(());
                }
                tx_words.insert(key.as_bytes(), bytes.as_slice())?;
                if let Some(ref usage_key) = usage_entry {
                    tx_usage.insert(usage_key.as_bytes(), date_bytes.as_slice())?;
                }
                Ok(())
            },
        );

        match result {
            Ok(()) => Ok(true),
            Err(e) => match map_tx_err(e) {
                None => Ok(false),
                Some(store_err) => Err(store_err),
            },
        }
    }
}
