//! Build-time configuration with an optional runtime override.
//!
//! The runtime config is read from `window.USER_ADMIN_CONFIG` (if present) so
//! static deployments can point at another backend without rebuilding.
//! Configuration values are public; do not store secrets here.

use tracing::Level;
use user_admin::ClientConfig;
use user_admin::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, normalize_value};

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout_ms: u64,
    pub log_level: Level,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let mut config = Self::from_build_env(
            option_env!("USER_ADMIN_API_BASE_URL"),
            option_env!("USER_ADMIN_TIMEOUT_MS"),
            option_env!("USER_ADMIN_LOG_LEVEL"),
        );

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    fn from_build_env(
        base_url: Option<&str>,
        timeout_ms: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        Self {
            api_base_url: base_url
                .and_then(normalize_value)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_ms: timeout_ms
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            log_level: log_level.and_then(parse_level).unwrap_or(Level::INFO),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.clone()).with_timeout_ms(self.timeout_ms)
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    timeout_ms: Option<u64>,
    log_level: Option<Level>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.timeout_ms {
        config.timeout_ms = value;
    }
    if let Some(value) = runtime.log_level {
        config.log_level = value;
    }
}

fn parse_level(value: &str) -> Option<Level> {
    normalize_value(value)?.parse().ok()
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("USER_ADMIN_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        timeout_ms: read_runtime_value(&object, "timeout_ms").and_then(|v| v.parse().ok()),
        log_level: read_runtime_value(&object, "log_level").and_then(|v| parse_level(&v)),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

/// Accepts both strings and numbers (`timeout_ms: 5000`).
#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key)).ok()?;
    let text = value
        .as_string()
        .or_else(|| value.as_f64().map(|n| (n as u64).to_string()))?;
    normalize_value(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_env_defaults() {
        let config = AppConfig::from_build_env(None, None, None);
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.client_config().url("/users"), "http://localhost:8000/users");
    }

    #[test]
    fn build_env_values_are_trimmed_and_validated() {
        let config = AppConfig::from_build_env(Some(" https://admin.api "), Some("oops"), Some("debug"));
        assert_eq!(config.api_base_url, "https://admin.api");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.log_level, Level::DEBUG);

        let blank = AppConfig::from_build_env(Some("   "), Some(" 2500 "), Some("loud"));
        assert_eq!(blank.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(blank.timeout_ms, 2500);
        assert_eq!(blank.log_level, Level::INFO);
    }

    #[test]
    fn apply_runtime_overrides_only_touches_present_values() {
        let mut config = AppConfig::from_build_env(None, None, None);
        apply_runtime_overrides(&mut config, RuntimeConfig::default());
        assert_eq!(config, AppConfig::from_build_env(None, None, None));

        let runtime = RuntimeConfig {
            api_base_url: Some("https://override".to_string()),
            timeout_ms: Some(3000),
            log_level: parse_level("warn"),
        };
        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://override");
        assert_eq!(config.client_config().timeout_ms, 3000);
        assert_eq!(config.log_level, Level::WARN);
    }
}
