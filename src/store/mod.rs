pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub sessions: sled::Tree,
    pub admins: sled::Tree,
    pub admin_sessions: sled::Tree,
    pub word_pool: sled::Tree,
    pub word_cycle_state: sled::Tree,
    pub word_usage_log: sled::Tree,
    pub daily_words: sled::Tree,
    pub user_word_cycle_state: sled::Tree,
    pub user_word_usage_log: sled::Tree,
    pub user_words: sled::Tree,
    pub notification_schedules: sled::Tree,
    pub word_deliveries: sled::Tree,
    pub notifications: sled::Tree,
    pub analytics_events: sled::Tree,
    pub config_versions: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let sessions = db.open_tree(trees::SESSIONS)?;
        let admins = db.open_tree(trees::ADMINS)?;
        let admin_sessions = db.open_tree(trees::ADMIN_SESSIONS)?;
        let word_pool = db.open_tree(trees::WORD_POOL)?;
        let word_cycle_state = db.open_tree(trees::WORD_CYCLE_STATE)?;
        let word_usage_log = db.open_tree(trees::WORD_USAGE_LOG)?;
        let daily_words = db.open_tree(trees::DAILY_WORDS)?;
        let user_word_cycle_state = db.open_tree(trees::USER_WORD_CYCLE_STATE)?;
        let user_word_usage_log = db.open_tree(trees::USER_WORD_USAGE_LOG)?;
        let user_words = db.open_tree(trees::USER_WORDS)?;
        let notification_schedules = db.open_tree(trees::NOTIFICATION_SCHEDULES)?;
        let word_deliveries = db.open_tree(trees::WORD_DELIVERIES)?;
        let notifications = db.open_tree(trees::NOTIFICATIONS)?;
        let analytics_events = db.open_tree(trees::ANALYTICS_EVENTS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;

        Ok(Self {
            db,
            users,
            sessions,
            admins,
            admin_sessions,
            word_pool,
            word_cycle_state,
            word_usage_log,
            daily_words,
            user_word_cycle_state,
            user_word_usage_log,
            user_words,
            notification_schedules,
            word_deliveries,
            notifications,
            analytics_events,
            config_versions,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
