//! Session Token 存储抽象
//!
//! Token 是整个客户端唯一的持久化状态：登录成功时写入，注销时删除，
//! 每次请求和每次导航时读取。存储后端通过 `SessionStore` 注入，
//! 浏览器端使用 LocalStorage，测试和原生环境使用内存实现。

use std::rc::Rc;
use std::sync::Arc;

use parking_lot::RwLock;

/// Session Token 存储能力
pub trait SessionStore {
    /// 读取当前 token，不存在时返回 None
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);

    /// token 是否存在（仅检查存在性，不校验过期；空字符串也算存在）
    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// 可以放进认证头的 token：空字符串视为没有登录
    fn bearer_token(&self) -> Option<String> {
        self.get().filter(|token| !token.is_empty())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) {
        (**self).set(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) {
        (**self).set(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: &str) {
        (**self).set(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// 内存存储实现
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(!store.is_authenticated());

        store.set("abc");
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert!(store.is_authenticated());

        store.clear();
        assert_eq!(store.get(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_string_token_is_present_but_not_a_bearer_token() {
        let store = MemorySessionStore::with_token("");
        assert!(store.is_authenticated());
        assert_eq!(store.bearer_token(), None);

        store.set("abc");
        assert_eq!(store.bearer_token().as_deref(), Some("abc"));
    }

    #[test]
    fn shared_handles_see_the_same_token() {
        let store = Arc::new(MemorySessionStore::new());
        let handle = Arc::clone(&store);
        handle.set("tok");
        assert_eq!(store.get().as_deref(), Some("tok"));

        let rc: Rc<dyn SessionStore> = Rc::new(MemorySessionStore::with_token("x"));
        let by_ref = &rc;
        by_ref.clear();
        assert!(!rc.is_authenticated());
    }
}
