//! Personalized selector: per-(user, band) cycles with a fixed difficulty
//! fallback chain and a bounded three-pass retry.

use chrono::{NaiveDate, Utc};

use crate::selection::band::DifficultyBand;
use crate::selection::seed::seed;
use crate::selection::{date_key, global, pick_by_rank, AssignmentOutcome, SelectionError};
use crate::store::operations::assignments::{UserUsageRecord, UserWordAssignment};
use crate::store::operations::words::WordPoolEntry;
use crate::store::Store;

pub fn get_or_assign_user_word(
    store: &Store,
    user_id: &str,
    date: NaiveDate,
    requested: Option<DifficultyBand>,
) -> Result<AssignmentOutcome<UserWordAssignment>, SelectionError> {
    let date_key = date_key(date);

    if let Some(existing) = store.get_user_word(user_id, &date_key)? {
        return Ok(AssignmentOutcome {
            assignment: existing,
            newly_created: false,
        });
    }

    let Some(requested_band) = requested else {
        // 未指定难度：完全委托给全局选词，档位字段置空
        let global_word = global::get_or_assign_global_word(store, date)?;
        let assignment = UserWordAssignment {
            user_id: user_id.to_string(),
            date: date_key.clone(),
            word_id: global_word.assignment.word_id,
            requested_band: None,
            effective_band: None,
            assigned_at: Utc::now(),
        };
        return commit(store, user_id, &date_key, assignment, None);
    };

    let chain = requested_band.fallback_chain();

    // Pass 1: current cycles as they stand.
    if let Some(hit) = attempt_pass(store, user_id, &date_key, chain)? {
        return finalize(store, user_id, &date_key, requested_band, hit);
    }

    // Pass 2: the requested band gets a fresh cycle.
    store.advance_user_cycle(user_id, requested_band)?;
    if let Some(hit) = attempt_pass(store, user_id, &date_key, chain)? {
        return finalize(store, user_id, &date_key, requested_band, hit);
    }

    // Pass 3: the remaining chain bands get fresh cycles too. Several bands
    // can exhaust simultaneously; giving each one chance to advance avoids
    // spurious failures while keeping the retry count constant.
    for band in chain.iter().filter(|band| **band != requested_band) {
        store.advance_user_cycle(user_id, *band)?;
    }
    if let Some(hit) = attempt_pass(store, user_id, &date_key, chain)? {
        return finalize(store, user_id, &date_key, requested_band, hit);
    }

    Err(SelectionError::NoWordsForPreferences)
}

struct BandHit {
    entry: WordPoolEntry,
    band: DifficultyBand,
    cycle: u64,
}

/// Walk the chain in order; the first band with an eligible, unused word in
/// its current cycle wins.
fn attempt_pass(
    store: &Store,
    user_id: &str,
    date_key: &str,
    chain: &[DifficultyBand],
) -> Result<Option<BandHit>, SelectionError> {
    let eligible = store.list_eligible_entries()?;

    for band in chain {
        let cycle = store.get_user_cycle(user_id, *band)?;
        let used = store.user_usage_in_cycle(user_id, *band, cycle)?;
        let band_seed = seed(&format!("{date_key}:{user_id}:{band}"));
        let pick = pick_by_rank(
            band_seed,
            eligible
                .iter()
                .filter(|entry| entry.band() == *band && !used.contains(&entry.id)),
        );
        if let Some(entry) = pick {
            return Ok(Some(BandHit {
                entry: entry.clone(),
                band: *band,
                cycle,
            }));
        }
    }

    Ok(None)
}

fn finalize(
    store: &Store,
    user_id: &str,
    date_key: &str,
    requested_band: DifficultyBand,
    hit: BandHit,
) -> Result<AssignmentOutcome<UserWordAssignment>, SelectionError> {
    let assignment = UserWordAssignment {
        user_id: user_id.to_string(),
        date: date_key.to_string(),
        word_id: hit.entry.id.clone(),
        requested_band: Some(requested_band),
        effective_band: Some(hit.band),
        assigned_at: Utc::now(),
    };
    let usage = UserUsageRecord {
        band: hit.band,
        cycle: hit.cycle,
    };
    commit(store, user_id, date_key, assignment, Some(usage))
}

/// Insert the assignment (+ usage row) atomically; on a lost race the stored
/// row is authoritative and the local pick is discarded.
fn commit(
    store: &Store,
    user_id: &str,
    date_key: &str,
    assignment: UserWordAssignment,
    usage: Option<UserUsageRecord>,
) -> Result<AssignmentOutcome<UserWordAssignment>, SelectionError> {
    if store.insert_user_word(&assignment, usage)? {
        tracing::debug!(
            user_id,
            date = %date_key,
            word_id = %assignment.word_id,
            effective = ?assignment.effective_band,
            "Assigned user word"
        );
        return Ok(AssignmentOutcome {
            assignment,
            newly_created: true,
        });
    }

    let winner = store.get_user_word(user_id, date_key)?.ok_or_else(|| {
        SelectionError::InvariantViolation(
            "user assignment vanished after conflicting insert".to_string(),
        )
    })?;
    Ok(AssignmentOutcome {
        assignment: winner,
        newly_created: false,
    })
}
