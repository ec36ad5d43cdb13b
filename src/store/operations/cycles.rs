use std::collections::HashSet;

use crate::selection::band::DifficultyBand;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Cycle counters start at 1 so that "no state yet" and "first cycle" read
/// the same. Stored as big-endian u64.
const FIRST_CYCLE: u64 = 1;

fn decode_cycle(raw: Option<&[u8]>) -> u64 {
    match raw {
        Some(bytes) if bytes.len() == 8 => {
            let arr: [u8; 8] = bytes.try_into().unwrap_or([0; 8]);
            u64::from_be_bytes(arr).max(FIRST_CYCLE)
        }
        _ => FIRST_CYCLE,
    }
}

fn increment_cycle(raw: Option<&[u8]>) -> Option<Vec<u8>> {
    let next = decode_cycle(raw).saturating_add(1);
    Some(next.to_be_bytes().to_vec())
}

impl Store {
    // -- global cycle ------------------------------------------------------

    pub fn get_global_cycle(&self) -> Result<u64, StoreError> {
        let key = keys::global_cycle_key();
        let raw = self.word_cycle_state.get(key.as_bytes())?;
        Ok(decode_cycle(raw.as_deref()))
    }

    /// Advance the global cycle and return the new value.
    ///
    /// update_and_fetch 本身是原子的；两个并发的"池已耗尽"判定仍可能各推进
    /// 一次造成双跳。cycle 只用于使用记录的集合过滤，双跳无碍正确性，按规
    /// 格容忍，不加锁。
    pub fn advance_global_cycle(&self) -> Result<u64, StoreError> {
        let key = keys::global_cycle_key();
        let raw = self
            .word_cycle_state
            .update_and_fetch(key.as_bytes(), increment_cycle)?;
        Ok(decode_cycle(raw.as_deref()))
    }

    pub fn record_global_usage(
        &self,
        cycle: u64,
        word_id: &str,
        date: &str,
    ) -> Result<(), StoreError> {
        let key = keys::global_usage_key(cycle, word_id);
        self.word_usage_log
            .insert(key.as_bytes(), date.as_bytes())?;
        Ok(())
    }

    /// Word ids already used in the given global cycle. Old-cycle rows are
    /// kept forever; the cycle prefix is the only filter.
    pub fn global_usage_in_cycle(&self, cycle: u64) -> Result<HashSet<String>, StoreError> {
        let prefix = keys::global_usage_prefix(cycle);
        let mut used = HashSet::new();
        for item in self.word_usage_log.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            if let Ok(key_str) = std::str::from_utf8(&key) {
                if let Some(word_id) = key_str.splitn(2, ':').nth(1) {
                    used.insert(word_id.to_string());
                }
            }
        }
        Ok(used)
    }

    // -- per-(user, band) cycles -------------------------------------------

    pub fn get_user_cycle(&self, user_id: &str, band: DifficultyBand) -> Result<u64, StoreError> {
        let key = keys::user_cycle_key(user_id, band);
        let raw = self.user_word_cycle_state.get(key.as_bytes())?;
        Ok(decode_cycle(raw.as_deref()))
    }

    pub fn advance_user_cycle(
        &self,
        user_id: &str,
        band: DifficultyBand,
    ) -> Result<u64, StoreError> {
        let key = keys::user_cycle_key(user_id, band);
        let raw = self
            .user_word_cycle_state
            .update_and_fetch(key.as_bytes(), increment_cycle)?;
        Ok(decode_cycle(raw.as_deref()))
    }

    pub fn user_usage_in_cycle(
        &self,
        user_id: &str,
        band: DifficultyBand,
        cycle: u64,
    ) -> Result<HashSet<String>, StoreError> {
        let prefix = keys::user_usage_prefix(user_id, band, cycle);
        let prefix_len = prefix.len();
        let mut used = HashSet::new();
        for item in self.user_word_usage_log.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            if let Ok(key_str) = std::str::from_utf8(&key) {
                used.insert(key_str[prefix_len..].to_string());
            }
        }
        Ok(used)
    }
}
