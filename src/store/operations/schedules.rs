use chrono::{DateTime, Duration, Days, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};
use crate::validation::{validate_delivery_time, validate_timezone};

/// Per-user delivery schedule. `next_delivery_at` is the UTC instant the
/// delivery worker compares against; `delivery_time` / `timezone` are the
/// user-facing local wall-clock preference it is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSchedule {
    pub user_id: String,
    pub delivery_time: String,
    pub timezone: String,
    pub enabled: bool,
    pub next_delivery_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn resolve_local(tz: Tz, naive: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        // 秋季回拨产生两个解：取较早的一个
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // 春季跳变产生空档：顺延一小时
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// "Tomorrow at HH:MM in the user's zone", converted back to UTC.
/// Timezone-aware on purpose: a flat +24h drifts across DST transitions.
pub fn compute_next_delivery(
    delivery_time: &str,
    timezone: &str,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, StoreError> {
    let time = validate_delivery_time(delivery_time)
        .map_err(|m| StoreError::Validation(m.to_string()))?;
    let tz = validate_timezone(timezone).map_err(|m| StoreError::Validation(m.to_string()))?;

    let local_tomorrow = after
        .with_timezone(&tz)
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| StoreError::Validation("delivery date out of range".to_string()))?;
    resolve_local(tz, local_tomorrow.and_time(time))
        .ok_or_else(|| StoreError::Validation("unresolvable local delivery time".to_string()))
}

/// First occurrence of HH:MM in the user's zone strictly after `after`:
/// today if the wall-clock time is still ahead, otherwise tomorrow.
pub fn compute_first_delivery(
    delivery_time: &str,
    timezone: &str,
    after: DateTime<Utc>,
) -> Result<DateTime<Utc>, StoreError> {
    let time = validate_delivery_time(delivery_time)
        .map_err(|m| StoreError::Validation(m.to_string()))?;
    let tz = validate_timezone(timezone).map_err(|m| StoreError::Validation(m.to_string()))?;

    let local_today = after.with_timezone(&tz).date_naive();
    if let Some(candidate) = resolve_local(tz, local_today.and_time(time)) {
        if candidate > after {
            return Ok(candidate);
        }
    }
    compute_next_delivery(delivery_time, timezone, after)
}

impl Store {
    pub fn upsert_schedule(&self, schedule: &NotificationSchedule) -> Result<(), StoreError> {
        let key = keys::schedule_key(&schedule.user_id);
        self.notification_schedules
            .insert(key.as_bytes(), Self::serialize(schedule)?)?;
        Ok(())
    }

    pub fn get_schedule(&self, user_id: &str) -> Result<Option<NotificationSchedule>, StoreError> {
        let key = keys::schedule_key(user_id);
        match self.notification_schedules.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Enabled schedules whose next delivery is due, oldest first, capped at
    /// `limit` (the worker's batch size).
    pub fn list_due_schedules(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<NotificationSchedule>, StoreError> {
        let mut due = Vec::new();
        for item in self.notification_schedules.iter() {
            let (_, raw) = item?;
            let schedule: NotificationSchedule = Self::deserialize(&raw)?;
            if schedule.enabled && schedule.next_delivery_at <= now {
                due.push(schedule);
            }
        }
        due.sort_by(|a, b| a.next_delivery_at.cmp(&b.next_delivery_at));
        due.truncate(limit);
        Ok(due)
    }

    pub fn advance_schedule(
        &self,
        user_id: &str,
        next_delivery_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut schedule = self
            .get_schedule(user_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "notification_schedule".to_string(),
                key: user_id.to_string(),
            })?;
        schedule.next_delivery_at = next_delivery_at;
        schedule.updated_at = Utc::now();
        self.upsert_schedule(&schedule)
    }
}
