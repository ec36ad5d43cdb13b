use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::selection::band::DifficultyBand;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Enrichment status as reported by the dictionary-enrichment collaborator.
/// The selection engine only reads it; writes come through the admin path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Pending,
    Ready,
    Failed,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPoolEntry {
    pub id: String,
    pub text: String,
    pub enabled: bool,
    pub tier: Option<i64>,
    pub source: String,
    pub enrichment: EnrichmentStatus,
    pub created_at: DateTime<Utc>,
}

impl WordPoolEntry {
    /// 可选性判定：enabled 且富化状态未失败。选词的所有路径都以此为准。
    pub fn is_eligible(&self) -> bool {
        self.enabled
            && matches!(
                self.enrichment,
                EnrichmentStatus::Pending | EnrichmentStatus::Ready
            )
    }

    pub fn band(&self) -> DifficultyBand {
        DifficultyBand::from_tier(self.tier)
    }
}

impl Store {
    pub fn upsert_word_entry(&self, entry: &WordPoolEntry) -> Result<(), StoreError> {
        let key = keys::word_key(&entry.id);
        self.word_pool
            .insert(key.as_bytes(), Self::serialize(entry)?)?;
        Ok(())
    }

    pub fn get_word_entry(&self, word_id: &str) -> Result<Option<WordPoolEntry>, StoreError> {
        let key = keys::word_key(word_id);
        match self.word_pool.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_word_entries(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WordPoolEntry>, StoreError> {
        let mut entries = Vec::new();
        for item in self.word_pool.iter() {
            let (_, v) = item?;
            entries.push(Self::deserialize::<WordPoolEntry>(&v)?);
        }
        entries.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(entries.into_iter().skip(offset).take(limit).collect())
    }

    pub fn count_word_entries(&self) -> Result<u64, StoreError> {
        Ok(self.word_pool.len() as u64)
    }

    /// The eligibility view: every word currently usable by the selectors.
    /// Point-in-time read; callers must not assume it stays stable.
    pub fn list_eligible_entries(&self) -> Result<Vec<WordPoolEntry>, StoreError> {
        let mut entries = Vec::new();
        for item in self.word_pool.iter() {
            let (_, v) = item?;
            let entry: WordPoolEntry = Self::deserialize(&v)?;
            if entry.is_eligible() {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    pub fn any_eligible_entry(&self) -> Result<bool, StoreError> {
        for item in self.word_pool.iter() {
            let (_, v) = item?;
            let entry: WordPoolEntry = Self::deserialize(&v)?;
            if entry.is_eligible() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn set_enrichment_status(
        &self,
        word_id: &str,
        status: EnrichmentStatus,
    ) -> Result<WordPoolEntry, StoreError> {
        let mut entry = self
            .get_word_entry(word_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "word".to_string(),
                key: word_id.to_string(),
            })?;
        entry.enrichment = status;
        self.upsert_word_entry(&entry)?;
        Ok(entry)
    }
}
