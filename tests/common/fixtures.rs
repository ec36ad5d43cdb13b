use chrono::Utc;

use dailyword_backend::store::operations::words::{EnrichmentStatus, WordPoolEntry};
use dailyword_backend::store::Store;

pub fn word_entry(id: &str, text: &str, tier: Option<i64>) -> WordPoolEntry {
    WordPoolEntry {
        id: id.to_string(),
        text: text.to_string(),
        enabled: true,
        tier,
        source: "fixture".to_string(),
        enrichment: EnrichmentStatus::Ready,
        created_at: Utc::now(),
    }
}

pub fn seed_word(store: &Store, id: &str, text: &str, tier: Option<i64>) {
    store
        .upsert_word_entry(&word_entry(id, text, tier))
        .expect("seed word");
}

/// Seed `count` eligible words in the given tier (same band).
pub fn seed_pool(store: &Store, count: usize, tier: Option<i64>) {
    for i in 0..count {
        seed_word(store, &format!("w{i:03}"), &format!("word-{i:03}"), tier);
    }
}
