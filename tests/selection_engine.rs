//! Storage-backed tests for the selection engine: determinism, cycling,
//! fallback and exhaustion behavior.

mod common;

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use tempfile::tempdir;

use common::fixtures::{seed_pool, seed_word, word_entry};
use dailyword_backend::selection::band::DifficultyBand;
use dailyword_backend::selection::{global, personalized, SelectionError};
use dailyword_backend::store::operations::words::EnrichmentStatus;
use dailyword_backend::store::Store;

fn open_store(dir: &tempfile::TempDir) -> Store {
    Store::open(dir.path().join("engine.sled").to_str().unwrap()).unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn global_selection_is_deterministic_per_date() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    for (i, text) in ["apple", "banana", "cherry", "date", "elderberry"]
        .iter()
        .enumerate()
    {
        seed_word(&store, &format!("w{i}"), text, None);
    }

    let first = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();
    let second = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();

    assert_eq!(first.assignment.word_id, second.assignment.word_id);
    assert!(first.newly_created);
    assert!(!second.newly_created);
}

#[test]
fn global_selection_survives_process_restart() {
    let dir = tempdir().unwrap();
    let word_id;
    {
        let store = open_store(&dir);
        seed_pool(&store, 10, None);
        word_id = global::get_or_assign_global_word(&store, date("2024-02-03"))
            .unwrap()
            .assignment
            .word_id;
        store.flush().unwrap();
    }

    // 重新打开同一数据库：记忆行优先，不得重算
    let store = open_store(&dir);
    let reread = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();
    assert_eq!(reread.assignment.word_id, word_id);
    assert!(!reread.newly_created);
}

#[test]
fn no_repeats_until_pool_is_exhausted() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 5, None);

    let start = date("2024-03-01");
    let mut seen = HashSet::new();
    for offset in 0..5 {
        let day = start + Duration::days(offset);
        let outcome = global::get_or_assign_global_word(&store, day).unwrap();
        assert!(
            seen.insert(outcome.assignment.word_id.clone()),
            "word repeated within cycle"
        );
        assert_eq!(outcome.assignment.cycle, 1);
    }
    assert_eq!(store.get_global_cycle().unwrap(), 1);

    // 第六天：周期耗尽，推进到 2，旧词重新可用
    let sixth = global::get_or_assign_global_word(&store, start + Duration::days(5)).unwrap();
    assert_eq!(sixth.assignment.cycle, 2);
    assert!(seen.contains(&sixth.assignment.word_id));
    assert_eq!(store.get_global_cycle().unwrap(), 2);
}

#[test]
fn fifty_days_from_a_hundred_words_stay_in_cycle_one() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 100, None);

    let start = date("2024-01-01");
    let mut seen = HashSet::new();
    for offset in 0..50 {
        let outcome =
            global::get_or_assign_global_word(&store, start + Duration::days(offset)).unwrap();
        assert!(seen.insert(outcome.assignment.word_id));
    }
    assert_eq!(seen.len(), 50);
    assert_eq!(store.get_global_cycle().unwrap(), 1);
}

#[test]
fn ineligible_words_are_never_selected() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);

    let mut disabled = word_entry("w-disabled", "disabled", None);
    disabled.enabled = false;
    store.upsert_word_entry(&disabled).unwrap();

    let mut failed = word_entry("w-failed", "failed", None);
    failed.enrichment = EnrichmentStatus::Failed;
    store.upsert_word_entry(&failed).unwrap();

    let mut not_found = word_entry("w-notfound", "notfound", None);
    not_found.enrichment = EnrichmentStatus::NotFound;
    store.upsert_word_entry(&not_found).unwrap();

    seed_word(&store, "w-ok", "only-eligible", None);

    // 无论排序如何，唯一合格词必然胜出；跨多天验证
    let start = date("2024-05-01");
    for offset in 0..3 {
        let outcome =
            global::get_or_assign_global_word(&store, start + Duration::days(offset)).unwrap();
        assert_eq!(outcome.assignment.word_id, "w-ok");
    }
}

#[test]
fn empty_pool_is_fatal() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);

    let mut disabled = word_entry("w1", "apple", None);
    disabled.enabled = false;
    store.upsert_word_entry(&disabled).unwrap();

    let err = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap_err();
    assert!(matches!(err, SelectionError::PoolEmpty));
    // 失败不落库
    assert!(store.get_daily_word("2024-02-03").unwrap().is_none());
}

#[test]
fn personalized_without_difficulty_delegates_to_global() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 10, None);

    let outcome =
        personalized::get_or_assign_user_word(&store, "u1", date("2024-02-03"), None).unwrap();
    let global_word = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();

    assert_eq!(outcome.assignment.word_id, global_word.assignment.word_id);
    assert_eq!(outcome.assignment.requested_band, None);
    assert_eq!(outcome.assignment.effective_band, None);
    assert!(!outcome.assignment.used_fallback());
}

#[test]
fn personalized_is_idempotent_per_user_date() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 10, Some(10));

    let first = personalized::get_or_assign_user_word(
        &store,
        "u1",
        date("2024-02-03"),
        Some(DifficultyBand::Easy),
    )
    .unwrap();
    let second = personalized::get_or_assign_user_word(
        &store,
        "u1",
        date("2024-02-03"),
        Some(DifficultyBand::Easy),
    )
    .unwrap();

    assert!(first.newly_created);
    assert!(!second.newly_created);
    assert_eq!(first.assignment.word_id, second.assignment.word_id);

    // 即使换一个请求档位，已有行仍然权威
    let third = personalized::get_or_assign_user_word(
        &store,
        "u1",
        date("2024-02-03"),
        Some(DifficultyBand::Advanced),
    )
    .unwrap();
    assert!(!third.newly_created);
    assert_eq!(third.assignment.requested_band, Some(DifficultyBand::Easy));
}

#[test]
fn fallback_reports_effective_band() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    // easy 档无词，balanced 档有词
    seed_word(&store, "w-bal", "balanced-word", Some(50));

    let outcome = personalized::get_or_assign_user_word(
        &store,
        "u1",
        date("2024-02-03"),
        Some(DifficultyBand::Easy),
    )
    .unwrap();

    assert_eq!(outcome.assignment.word_id, "w-bal");
    assert_eq!(outcome.assignment.requested_band, Some(DifficultyBand::Easy));
    assert_eq!(
        outcome.assignment.effective_band,
        Some(DifficultyBand::Balanced)
    );
    assert!(outcome.assignment.used_fallback());

    // 持久化的行与返回值一致
    let stored = store.get_user_word("u1", "2024-02-03").unwrap().unwrap();
    assert_eq!(stored.requested_band, Some(DifficultyBand::Easy));
    assert_eq!(stored.effective_band, Some(DifficultyBand::Balanced));
}

#[test]
fn exhausted_fallback_chain_is_user_visible_not_fatal() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    // 池非空，但 easy 的回退链 [easy, balanced] 两档都没有词
    seed_word(&store, "w-adv", "advanced-word", Some(90));

    let err = personalized::get_or_assign_user_word(
        &store,
        "u1",
        date("2024-02-03"),
        Some(DifficultyBand::Easy),
    )
    .unwrap_err();
    assert!(matches!(err, SelectionError::NoWordsForPreferences));

    // 全局路径不受影响
    assert!(global::get_or_assign_global_word(&store, date("2024-02-03")).is_ok());
}

#[test]
fn per_user_band_cycle_advances_on_exhaustion() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 3, Some(10)); // 3 easy words

    let start = date("2024-04-01");
    let mut seen = HashSet::new();
    for offset in 0..3 {
        let outcome = personalized::get_or_assign_user_word(
            &store,
            "u1",
            start + Duration::days(offset),
            Some(DifficultyBand::Easy),
        )
        .unwrap();
        assert!(seen.insert(outcome.assignment.word_id.clone()));
        assert_eq!(
            outcome.assignment.effective_band,
            Some(DifficultyBand::Easy)
        );
    }
    assert_eq!(store.get_user_cycle("u1", DifficultyBand::Easy).unwrap(), 1);

    // 第四天：easy 档耗尽，推进该档周期后复用
    let fourth = personalized::get_or_assign_user_word(
        &store,
        "u1",
        start + Duration::days(3),
        Some(DifficultyBand::Easy),
    )
    .unwrap();
    assert!(seen.contains(&fourth.assignment.word_id));
    assert!(!fourth.assignment.used_fallback());
    assert_eq!(store.get_user_cycle("u1", DifficultyBand::Easy).unwrap(), 2);
}

#[test]
fn two_users_diverge_within_twelve_days() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 60, Some(10)); // 60 easy words

    let start = date("2024-03-01");
    let mut alice = Vec::new();
    let mut bob = Vec::new();
    for offset in 0..12 {
        let day = start + Duration::days(offset);
        alice.push(
            personalized::get_or_assign_user_word(&store, "alice", day, Some(DifficultyBand::Easy))
                .unwrap()
                .assignment
                .word_id,
        );
        bob.push(
            personalized::get_or_assign_user_word(&store, "bob", day, Some(DifficultyBand::Easy))
                .unwrap()
                .assignment
                .word_id,
        );
    }

    assert_ne!(alice, bob, "two users should diverge on at least one day");
    // 各自序列内部无重复
    assert_eq!(alice.iter().collect::<HashSet<_>>().len(), 12);
    assert_eq!(bob.iter().collect::<HashSet<_>>().len(), 12);
}

#[test]
fn lost_race_rereads_the_winner() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 5, None);

    // 模拟并发竞争者抢先写入
    let winner = dailyword_backend::store::operations::assignments::DailyWordAssignment {
        date: "2024-02-03".to_string(),
        word_id: "w002".to_string(),
        cycle: 1,
        assigned_at: chrono::Utc::now(),
    };
    assert!(store.insert_daily_word(&winner).unwrap());

    let outcome = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();
    assert_eq!(outcome.assignment.word_id, "w002");
    assert!(!outcome.newly_created);
}

#[test]
fn usage_log_tracks_assignments() {
    let dir = tempdir().unwrap();
    let store = open_store(&dir);
    seed_pool(&store, 5, None);

    let outcome = global::get_or_assign_global_word(&store, date("2024-02-03")).unwrap();
    let used = store.global_usage_in_cycle(outcome.assignment.cycle).unwrap();
    assert!(used.contains(&outcome.assignment.word_id));
}
