//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，
//! 并在其上实现 Session Token 的 `SessionStore`。

use tracing::warn;
use user_admin::SessionStore;
use user_admin::shared::TOKEN_STORAGE_KEY;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct WebStorage;

impl WebStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 基于 LocalStorage 的 Session Token 存储
///
/// 不缓存任何状态，每次都直接读写 LocalStorage，多个实例共享同一份 token。
#[derive(Debug, Clone)]
pub struct WebSession {
    key: String,
}

impl WebSession {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new(TOKEN_STORAGE_KEY)
    }
}

impl SessionStore for WebSession {
    fn get(&self) -> Option<String> {
        WebStorage::get(&self.key)
    }

    fn set(&self, token: &str) {
        if !WebStorage::set(&self.key, token) {
            warn!(key = %self.key, "failed to persist session token");
        }
    }

    fn clear(&self) {
        if !WebStorage::delete(&self.key) {
            warn!(key = %self.key, "failed to remove session token");
        }
    }
}
