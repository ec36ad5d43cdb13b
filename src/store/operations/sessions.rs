use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub token_type: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

fn get_from_tree(tree: &sled::Tree, token_hash: &str) -> Result<Option<Session>, StoreError> {
    let key = keys::session_key(token_hash);
    let Some(raw) = tree.get(key.as_bytes())? else {
        return Ok(None);
    };

    let session = Store::deserialize::<Session>(&raw)?;
    if session.revoked || session.expires_at <= Utc::now() {
        return Ok(None);
    }

    Ok(Some(session))
}

fn cleanup_tree(tree: &sled::Tree) -> Result<u32, StoreError> {
    let now = Utc::now();
    let mut stale_keys = Vec::new();
    for item in tree.iter() {
        let (key, raw) = item?;
        match Store::deserialize::<Session>(&raw) {
            Ok(session) if session.revoked || session.expires_at <= now => {
                stale_keys.push(key.to_vec());
            }
            Ok(_) => {}
            // index rows and corrupt entries are skipped, not deleted
            Err(_) => {}
        }
    }

    let mut removed = 0u32;
    for key in stale_keys {
        if tree.remove(key)?.is_some() {
            removed += 1;
        }
    }
    Ok(removed)
}

impl Store {
    pub fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let key = keys::session_key(&session.token_hash);
        self.sessions
            .insert(key.as_bytes(), Self::serialize(session)?)?;
        Ok(())
    }

    /// 获取会话，如果已过期或已撤销则返回 None。
    /// 不产生删除副作用——过期会话的清理由后台 session_cleanup worker 负责。
    pub fn get_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        get_from_tree(&self.sessions, token_hash)
    }

    pub fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let key = keys::session_key(token_hash);
        self.sessions.remove(key.as_bytes())?;
        Ok(())
    }

    pub fn create_admin_session(&self, session: &Session) -> Result<(), StoreError> {
        let key = keys::session_key(&session.token_hash);
        self.admin_sessions
            .insert(key.as_bytes(), Self::serialize(session)?)?;
        Ok(())
    }

    pub fn get_admin_session(&self, token_hash: &str) -> Result<Option<Session>, StoreError> {
        get_from_tree(&self.admin_sessions, token_hash)
    }

    /// Remove expired/revoked sessions from both session trees.
    /// Returns the number of rows removed.
    pub fn cleanup_expired_sessions(&self) -> Result<u32, StoreError> {
        Ok(cleanup_tree(&self.sessions)? + cleanup_tree(&self.admin_sessions)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn session(token_hash: &str, expires_in_hours: i64) -> Session {
        Session {
            token_hash: token_hash.to_string(),
            user_id: "u1".to_string(),
            token_type: "user".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
            revoked: false,
        }
    }

    #[test]
    fn expired_session_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("sess").to_str().unwrap()).unwrap();

        store.create_session(&session("live", 1)).unwrap();
        store.create_session(&session("dead", -1)).unwrap();

        assert!(store.get_session("live").unwrap().is_some());
        assert!(store.get_session("dead").unwrap().is_none());
    }

    #[test]
    fn cleanup_removes_only_stale_rows() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("sess2").to_str().unwrap()).unwrap();

        store.create_session(&session("live", 1)).unwrap();
        store.create_session(&session("dead", -1)).unwrap();
        let mut revoked = session("revoked", 1);
        revoked.revoked = true;
        store.create_session(&revoked).unwrap();

        let removed = store.cleanup_expired_sessions().unwrap();
        assert_eq!(removed, 2);
        assert!(store.get_session("live").unwrap().is_some());
    }
}
