//! Hourly purge of expired and revoked sessions.

use crate::store::Store;

pub async fn run(store: &Store) {
    match store.cleanup_expired_sessions() {
        Ok(removed) => {
            if removed > 0 {
                tracing::info!(removed, "Session cleanup removed stale sessions");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
    }
}
