//! Delivery scheduler: scans due notification schedules in bounded batches,
//! makes sure the user's local date has a word assigned, records the
//! delivery exactly once, and advances each schedule to its next local
//! occurrence.

use chrono::Utc;

use crate::selection::global;
use crate::selection::SelectionError;
use crate::services::analytics::AnalyticsSink;
use crate::services::notifier::WordNotifier;
use crate::store::operations::deliveries::WordDelivery;
use crate::store::operations::schedules::{compute_next_delivery, NotificationSchedule};
use crate::store::Store;

pub async fn run(
    store: &Store,
    notifier: &dyn WordNotifier,
    analytics: &dyn AnalyticsSink,
    batch_size: usize,
) {
    let mut delivered = 0u32;
    let mut skipped = 0u32;
    let mut failed = 0u32;

    loop {
        let now = Utc::now();
        let due = match store.list_due_schedules(now, batch_size.max(1)) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, "Word delivery: failed to list due schedules");
                return;
            }
        };
        if due.is_empty() {
            break;
        }

        let mut advanced = 0u32;
        for schedule in &due {
            match process_schedule(store, notifier, analytics, schedule) {
                Ok(Delivered::Fresh) => {
                    delivered += 1;
                    advanced += 1;
                }
                Ok(Delivered::AlreadyHad) => {
                    skipped += 1;
                    advanced += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %schedule.user_id,
                        error = %e,
                        "Word delivery: schedule processing failed"
                    );
                    failed += 1;
                    // 推进失败的日程若仍滞留在 due 集合中会导致空转，按
                    // advanced 计数保护退出
                    if advance(store, schedule).is_ok() {
                        advanced += 1;
                    }
                }
            }
        }

        // No schedule left the due set this round; bail out rather than spin.
        if advanced == 0 {
            tracing::error!("Word delivery: batch made no progress, aborting run");
            break;
        }
    }

    tracing::info!(delivered, skipped, failed, "Word delivery run complete");
}

enum Delivered {
    Fresh,
    AlreadyHad,
}

fn process_schedule(
    store: &Store,
    notifier: &dyn WordNotifier,
    analytics: &dyn AnalyticsSink,
    schedule: &NotificationSchedule,
) -> Result<Delivered, SelectionError> {
    // The schedule's due instant, not "now", decides which calendar day the
    // user is in; a late worker run must not skip a date.
    let tz: chrono_tz::Tz = schedule
        .timezone
        .parse()
        .map_err(|_| SelectionError::Store(crate::store::StoreError::Validation(
            format!("schedule has invalid timezone: {}", schedule.timezone),
        )))?;
    let local_date = schedule.next_delivery_at.with_timezone(&tz).date_naive();

    let outcome = global::get_or_assign_global_word(store, local_date)?;

    let fresh = store.insert_delivery_once(&WordDelivery {
        user_id: schedule.user_id.clone(),
        date: outcome.assignment.date.clone(),
        word_id: outcome.assignment.word_id.clone(),
        delivered_at: Utc::now(),
    })?;

    if fresh {
        notifier.deliver(
            &schedule.user_id,
            &outcome.assignment.word_id,
            local_date,
        );
        analytics.record_event(
            "word_delivered",
            Some(&schedule.user_id),
            serde_json::json!({
                "wordId": outcome.assignment.word_id,
                "date": outcome.assignment.date,
            }),
        );
    }

    // Advance unconditionally; even an already-delivered date moves on.
    advance(store, schedule)?;

    Ok(if fresh {
        Delivered::Fresh
    } else {
        Delivered::AlreadyHad
    })
}

fn advance(store: &Store, schedule: &NotificationSchedule) -> Result<(), SelectionError> {
    let next = compute_next_delivery(
        &schedule.delivery_time,
        &schedule.timezone,
        schedule.next_delivery_at.max(Utc::now()),
    )?;
    store.advance_schedule(&schedule.user_id, next)?;
    Ok(())
}
