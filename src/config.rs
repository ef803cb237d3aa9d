//! 客户端配置
//!
//! 默认值与后端本地开发环境一致；原生环境可以通过环境变量覆盖，
//! 浏览器端由前端在加载时构建配置后传入。

use std::time::Duration;

use user_admin_shared::TOKEN_STORAGE_KEY;

/// 这些是默认值，如果环境变量中没有定义，则使用这些值
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const ENV_BASE_URL: &str = "USER_ADMIN_API_BASE_URL";
const ENV_TIMEOUT_MS: &str = "USER_ADMIN_TIMEOUT_MS";
const ENV_TOKEN_KEY: &str = "USER_ADMIN_TOKEN_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端服务地址
    pub base_url: String,
    /// 单次请求的超时时间（毫秒）
    pub timeout_ms: u64,
    /// Session Token 在持久化存储中的键名
    ///
    /// 只对按键名读写的存储生效（浏览器端的 LocalStorage）；
    /// `MemorySessionStore` 只保存一个 token，不使用该字段。
    pub token_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            token_key: TOKEN_STORAGE_KEY.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// 从进程环境变量读取配置，读不到或为空就用默认值
    ///
    /// 原生环境通过 `native_api_from_env` 使用。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).and_then(|v| normalize_value(&v));

        Self {
            base_url: read(ENV_BASE_URL).unwrap_or(defaults.base_url),
            timeout_ms: read(ENV_TIMEOUT_MS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            token_key: read(ENV_TOKEN_KEY).unwrap_or(defaults.token_key),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 拼接 base_url 与 path，处理两侧多余的 `/`
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = path.trim();

        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}

/// 去掉首尾空白，空字符串视为未设置
pub fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn url_joins_base_and_path() {
        let config = ClientConfig::new("http://api.local/");
        assert_eq!(config.url("/users"), "http://api.local/users");
        assert_eq!(config.url("user/5"), "http://api.local/user/5");

        let relative = ClientConfig::new("");
        assert_eq!(relative.url("/login"), "/login");
    }

    #[test]
    fn lookup_falls_back_to_defaults() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.token_key, "token");
    }

    #[test]
    fn lookup_overrides_and_ignores_blank_or_invalid_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "  https://admin.example.com "),
            (ENV_TIMEOUT_MS, "not-a-number"),
            (ENV_TOKEN_KEY, "   "),
        ]);
        let config = ClientConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://admin.example.com");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.token_key, "token");
    }
}
