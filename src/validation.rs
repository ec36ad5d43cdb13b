/// 公共验证函数模块
/// 提供密码、邮箱、投递时间等输入验证，供认证和日程相关路由共用。
use chrono::NaiveTime;

/// 验证密码强度：至少 8 字符、最多 256 字符，需包含大小写字母和数字
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 256 {
        return Err("Password must be at most 256 characters");
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_lower || !has_digit {
        return Err("Password must contain an uppercase letter, a lowercase letter and a digit");
    }
    Ok(())
}

/// 验证邮箱格式：user@domain.tld
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let parts: Vec<&str> = email.splitn(2, '@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'+' || b == b'-')
    {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return false;
    }
    domain
        .split('.')
        .all(|part| !part.is_empty() && !part.starts_with('-') && !part.ends_with('-'))
}

/// 验证用户名格式：2-50 字符，只允许字母、数字、下划线、连字符和空格
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let char_count = username.chars().count();
    if char_count < 2 || char_count > 50 {
        return Err("Username must be between 2 and 50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("Username may only contain letters, digits, underscores, hyphens and spaces");
    }
    Ok(())
}

/// 验证投递时间：严格 HH:MM（24 小时制）
pub fn validate_delivery_time(time: &str) -> Result<NaiveTime, &'static str> {
    if time.len() != 5 || time.as_bytes()[2] != b':' {
        return Err("Delivery time must be in HH:MM format");
    }
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| "Delivery time must be in HH:MM format")
}

/// 验证 IANA 时区名（如 "Asia/Shanghai"）
pub fn validate_timezone(name: &str) -> Result<chrono_tz::Tz, &'static str> {
    name.parse::<chrono_tz::Tz>()
        .map_err(|_| "Unknown IANA timezone")
}
