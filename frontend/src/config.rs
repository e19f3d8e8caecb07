//! 运行时配置
//!
//! 浏览器没有进程环境变量，覆盖值在构建时通过 `option_env!` 注入，
//! 缺失或非法时回退到默认值。

use std::time::Duration;

/// 这些是默认值，构建环境未定义对应变量时使用
const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_TOKEN_KEY: &str = "token";
const DEFAULT_PAGE_SIZE: usize = 9;
const DEFAULT_NOTIFICATION_MS: u64 = 6000;

const VAR_API_URL: &str = "NEWS_DESK_API_URL";
const VAR_TOKEN_KEY: &str = "NEWS_DESK_TOKEN_KEY";
const VAR_PAGE_SIZE: &str = "NEWS_DESK_PAGE_SIZE";
const VAR_NOTIFICATION_MS: &str = "NEWS_DESK_NOTIFICATION_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API 根地址（已包含 `/api`，无尾部斜杠）
    pub api_base_url: String,
    /// LocalStorage 中保存令牌的键
    pub token_storage_key: String,
    /// 列表每页条数
    pub page_size: usize,
    /// 通知自动隐藏延迟
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
        }
    }
}

impl ClientConfig {
    /// 读取构建时注入的覆盖值
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            VAR_API_URL => option_env!("NEWS_DESK_API_URL"),
            VAR_TOKEN_KEY => option_env!("NEWS_DESK_TOKEN_KEY"),
            VAR_PAGE_SIZE => option_env!("NEWS_DESK_PAGE_SIZE"),
            VAR_NOTIFICATION_MS => option_env!("NEWS_DESK_NOTIFICATION_MS"),
            _ => None,
        })
    }

    /// 通过任意查找函数构建配置，便于测试
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup(VAR_API_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);

        let token_storage_key = lookup(VAR_TOKEN_KEY)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.token_storage_key);

        let page_size = parse_or(lookup(VAR_PAGE_SIZE), VAR_PAGE_SIZE, defaults.page_size)
            .max(1);

        let notification_ttl = Duration::from_millis(parse_or(
            lookup(VAR_NOTIFICATION_MS),
            VAR_NOTIFICATION_MS,
            DEFAULT_NOTIFICATION_MS,
        ));

        Self {
            api_base_url,
            token_storage_key,
            page_size,
            notification_ttl,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(raw: Option<&str>, var: &str, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var, value, "invalid config override, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.page_size, 9);
        assert_eq!(config.token_storage_key, "token");
    }

    #[test]
    fn overrides_are_applied_and_trimmed() {
        let config = ClientConfig::from_lookup(|key| match key {
            "NEWS_DESK_API_URL" => Some("https://news.example.com/api/"),
            "NEWS_DESK_PAGE_SIZE" => Some("12"),
            "NEWS_DESK_NOTIFICATION_MS" => Some("1500"),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://news.example.com/api");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.notification_ttl, Duration::from_millis(1500));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = ClientConfig::from_lookup(|key| match key {
            "NEWS_DESK_PAGE_SIZE" => Some("many"),
            _ => None,
        });
        assert_eq!(config.page_size, 9);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let config = ClientConfig::from_lookup(|key| match key {
            "NEWS_DESK_PAGE_SIZE" => Some("0"),
            _ => None,
        });
        assert_eq!(config.page_size, 1);
    }
}
