pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const ADMINS: &str = "admins";
pub const ADMIN_SESSIONS: &str = "admin_sessions";

// Word catalog (read-mostly; enrichment status is written by the admin path)
pub const WORD_POOL: &str = "word_pool";

// Selection engine state
pub const WORD_CYCLE_STATE: &str = "word_cycle_state";
pub const WORD_USAGE_LOG: &str = "word_usage_log";
pub const DAILY_WORDS: &str = "daily_words";
pub const USER_WORD_CYCLE_STATE: &str = "user_word_cycle_state";
pub const USER_WORD_USAGE_LOG: &str = "user_word_usage_log";
pub const USER_WORDS: &str = "user_words";

// Delivery pipeline
pub const NOTIFICATION_SCHEDULES: &str = "notification_schedules";
pub const WORD_DELIVERIES: &str = "word_deliveries";
pub const NOTIFICATIONS: &str = "notifications";
pub const ANALYTICS_EVENTS: &str = "analytics_events";

pub const CONFIG_VERSIONS: &str = "config_versions";
