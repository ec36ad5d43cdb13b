//! Shared word-of-the-day selector.
//!
//! State machine per date: no assignment → selecting → assigned. The
//! `daily_words` row is the durable memo; once present it is authoritative
//! and is never recomputed.

use chrono::{NaiveDate, Utc};

use crate::selection::seed::seed;
use crate::selection::{date_key, pick_by_rank, AssignmentOutcome, SelectionError};
use crate::store::operations::assignments::DailyWordAssignment;
use crate::store::Store;

pub fn get_or_assign_global_word(
    store: &Store,
    date: NaiveDate,
) -> Result<AssignmentOutcome<DailyWordAssignment>, SelectionError> {
    let date_key = date_key(date);

    if let Some(existing) = store.get_daily_word(&date_key)? {
        return Ok(AssignmentOutcome {
            assignment: existing,
            newly_created: false,
        });
    }

    let date_seed = seed(&date_key);
    let mut cycle = store.get_global_cycle()?;

    // 至多两轮：当前周期一次，推进周期后再一次；不得放宽成无界循环。
    for attempt in 0..2 {
        let eligible = store.list_eligible_entries()?;
        let used = store.global_usage_in_cycle(cycle)?;
        let pick = pick_by_rank(
            date_seed,
            eligible.iter().filter(|entry| !used.contains(&entry.id)),
        );

        if let Some(entry) = pick {
            let assignment = DailyWordAssignment {
                date: date_key.clone(),
                word_id: entry.id.clone(),
                cycle,
                assigned_at: Utc::now(),
            };
            if store.insert_daily_word(&assignment)? {
                tracing::debug!(date = %date_key, word_id = %assignment.word_id, cycle, "Assigned daily word");
                return Ok(AssignmentOutcome {
                    assignment,
                    newly_created: true,
                });
            }
            // Lost the race: discard the local pick, the stored row wins.
            let winner = store.get_daily_word(&date_key)?.ok_or_else(|| {
                SelectionError::InvariantViolation(
                    "daily assignment vanished after conflicting insert".to_string(),
                )
            })?;
            return Ok(AssignmentOutcome {
                assignment: winner,
                newly_created: false,
            });
        }

        if attempt == 0 {
            // `eligible` ignores the cycle filter, so empty here means the
            // pool itself is empty, not merely exhausted.
            if eligible.is_empty() {
                return Err(SelectionError::PoolEmpty);
            }
            cycle = store.advance_global_cycle()?;
            tracing::info!(date = %date_key, cycle, "Global cycle exhausted, advanced");
        }
    }

    // A word was eligible a moment ago but the fresh cycle found nothing.
    // Data inconsistency, not normal flow.
    Err(SelectionError::InvariantViolation(format!(
        "no candidate for {date_key} after advancing to cycle {cycle}"
    )))
}
