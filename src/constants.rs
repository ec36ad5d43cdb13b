/// 难度分级阈值：tier <= 35 为 easy
pub const EASY_TIER_MAX: i64 = 35;

/// 难度分级阈值：tier > 60 为 advanced，(35, 60] 或 null 为 balanced
pub const BALANCED_TIER_MAX: i64 = 60;

/// 列表接口默认分页大小
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// 列表接口最大分页大小
pub const MAX_PAGE_SIZE: u64 = 100;

/// Delivery worker batch size (schedules pulled per storage round-trip).
pub const DEFAULT_DELIVERY_BATCH_SIZE: usize = 100;

/// 系统默认最大用户数
pub const DEFAULT_MAX_USERS: u64 = 10_000;

/// Default delivery time for a fresh schedule (local HH:MM).
pub const DEFAULT_DELIVERY_TIME: &str = "08:00";

/// Default schedule timezone.
pub const DEFAULT_TIMEZONE: &str = "UTC";
